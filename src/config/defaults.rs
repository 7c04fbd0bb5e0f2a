pub const DEFAULT_TTS_CMD: &str = "espeak-ng";
pub const DEFAULT_SAY_TIMEOUT_MS: u64 = 30_000;
pub const MIN_SAY_TIMEOUT_MS: u64 = 1_000;
pub const MAX_SAY_TIMEOUT_MS: u64 = 300_000;

pub(super) const MAX_CONTACT_MESSAGE_CHARS: usize = 500;
pub(super) const CONTACT_NUMBER_DIGITS: std::ops::RangeInclusive<usize> = 6..=15;
pub(super) const LANG_MARKER_CHARS: std::ops::RangeInclusive<usize> = 2..=8;
pub(super) const ISO_639_1_CODES: &[&str] = &[
    "af", "am", "ar", "az", "be", "bg", "bn", "bs", "ca", "cs", "cy", "da", "de", "el", "en", "es",
    "et", "eu", "fa", "fi", "fil", "fr", "ga", "gl", "gu", "he", "hi", "hr", "hu", "hy", "id",
    "is", "it", "ja", "jv", "ka", "kk", "km", "kn", "ko", "lo", "lt", "lv", "mk", "ml", "mn", "mr",
    "ms", "my", "ne", "nl", "no", "pa", "pl", "pt", "qu", "ro", "ru", "si", "sk", "sl", "sq", "sr",
    "sv", "sw", "ta", "te", "th", "tr", "uk", "ur", "vi", "zh",
];
