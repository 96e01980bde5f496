//! Locales and the text encodings derived from their code pages.
//!
//! Localized text in a library is tagged with a numeric Windows locale identifier (LCID) and
//! stored in that locale's default OEM code page.  The codec never invents locales; it
//! resolves them through a [`LocaleService`].  [`LocaleTable::windows()`] provides a built-in
//! table of the Windows locales which is used whenever no other service is supplied.

use std::convert::TryFrom;

use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use oem_cp::code_table::{DECODING_TABLE_CP_MAP, ENCODING_TABLE_CP_MAP};
use oem_cp::encode_string_checked;

/// Code page value meaning "no OEM code page"; text for such locales is stored as UTF-16.
pub const UNICODE_ONLY_CODE_PAGE: u32 = 1;

/// A locale as known to a [`LocaleService`].
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Locale {
    id: u32,
    name: String,
    code_page: u32,
}

impl Locale {
    /// Creates a locale, or `None` if its code page has no supported encoding.
    pub fn new(id: u32, name: &str, code_page: u32) -> Option<Locale> {
        TextEncoding::for_code_page(code_page)?;
        Some(Locale {
            id,
            name: String::from(name),
            code_page,
        })
    }
    /// The numeric locale identifier used in localized text tags.
    pub fn id(&self) -> u32 {
        self.id
    }
    /// The stable locale name, e.g. `en-US`.
    pub fn name(&self) -> &str {
        &self.name
    }
    /// The default OEM code page, e.g. 437 for `en-US`.
    pub fn code_page(&self) -> u32 {
        self.code_page
    }
    /// The encoding used for this locale's text.  `None` only for a locale that did not come
    /// from `new`, e.g. one deserialized with an unsupported code page.
    pub fn encoding(&self) -> Option<TextEncoding> {
        TextEncoding::for_code_page(self.code_page)
    }
    #[cfg(test)]
    pub(crate) fn new_unchecked(id: u32, name: &str, code_page: u32) -> Locale {
        Locale {
            id,
            name: String::from(name),
            code_page,
        }
    }
}

/// The text encoding derived from a locale's code page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextEncoding {
    /// 16 bits per unit, little-endian, written with a byte order mark.
    Utf16,
    /// A code page known to `encoding_rs`, including the multi-byte East Asian ones.
    CodePage(&'static Encoding),
    /// A single-byte DOS code page such as 437 or 850.
    Oem(u16),
}

impl TextEncoding {
    /// Resolves a code page, preferring `encoding_rs` where both know it.
    pub fn for_code_page(code_page: u32) -> Option<TextEncoding> {
        if code_page == UNICODE_ONLY_CODE_PAGE {
            return Some(TextEncoding::Utf16);
        }
        if let Some(encoding) = codepage_to_encoding(code_page) {
            return Some(TextEncoding::CodePage(encoding));
        }
        let code_page = u16::try_from(code_page).ok()?;
        if DECODING_TABLE_CP_MAP.get(&code_page).is_some()
            && ENCODING_TABLE_CP_MAP.get(&code_page).is_some()
        {
            Some(TextEncoding::Oem(code_page))
        } else {
            None
        }
    }
    /// Encodes `text`, or returns `None` if a character has no representation.
    pub fn encode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            TextEncoding::Utf16 => {
                let mut bytes = vec![0xFF, 0xFE];
                for unit in text.encode_utf16() {
                    bytes.extend_from_slice(&unit.to_le_bytes());
                }
                Some(bytes)
            }
            TextEncoding::CodePage(encoding) => {
                let (bytes, _, had_errors) = encoding.encode(text);
                if had_errors {
                    None
                } else {
                    Some(bytes.into_owned())
                }
            }
            TextEncoding::Oem(code_page) => {
                encode_string_checked(text, ENCODING_TABLE_CP_MAP.get(&code_page)?)
            }
        }
    }
    /// Decodes `bytes`, or returns `None` if they are malformed.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf16 => {
                let (encoding, body) = match bytes {
                    [0xFF, 0xFE, rest @ ..] => (encoding_rs::UTF_16LE, rest),
                    [0xFE, 0xFF, rest @ ..] => (encoding_rs::UTF_16BE, rest),
                    _ => (encoding_rs::UTF_16LE, bytes),
                };
                encoding
                    .decode_without_bom_handling_and_without_replacement(body)
                    .map(|s| s.into_owned())
            }
            TextEncoding::CodePage(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|s| s.into_owned()),
            TextEncoding::Oem(code_page) => DECODING_TABLE_CP_MAP
                .get(&code_page)?
                .decode_string_checked(bytes),
        }
    }
}

/// Maps a Windows code page to its `encoding_rs` encoding.
pub fn codepage_to_encoding(code_page: u32) -> Option<&'static Encoding> {
    match code_page {
        866 => Some(encoding_rs::IBM866),
        874 => Some(encoding_rs::WINDOWS_874),
        932 => Some(encoding_rs::SHIFT_JIS),
        936 => Some(encoding_rs::GBK),
        949 => Some(encoding_rs::EUC_KR),
        950 => Some(encoding_rs::BIG5),
        1250 => Some(encoding_rs::WINDOWS_1250),
        1251 => Some(encoding_rs::WINDOWS_1251),
        1252 => Some(encoding_rs::WINDOWS_1252),
        1253 => Some(encoding_rs::WINDOWS_1253),
        1254 => Some(encoding_rs::WINDOWS_1254),
        1255 => Some(encoding_rs::WINDOWS_1255),
        1256 => Some(encoding_rs::WINDOWS_1256),
        1257 => Some(encoding_rs::WINDOWS_1257),
        1258 => Some(encoding_rs::WINDOWS_1258),
        10000 => Some(encoding_rs::MACINTOSH),
        20866 => Some(encoding_rs::KOI8_R),
        20932 => Some(encoding_rs::EUC_JP),
        21866 => Some(encoding_rs::KOI8_U),
        28592 => Some(encoding_rs::ISO_8859_2),
        28595 => Some(encoding_rs::ISO_8859_5),
        28597 => Some(encoding_rs::ISO_8859_7),
        28605 => Some(encoding_rs::ISO_8859_15),
        54936 => Some(encoding_rs::GB18030),
        65001 => Some(encoding_rs::UTF_8),
        _ => None,
    }
}

/// Supplies the known locales to the codec.
pub trait LocaleService {
    /// Every known locale, in canonical enumeration order.  Localized text is written in
    /// this order.
    fn all_locales(&self) -> &[Locale];
    fn locale_by_id(&self, id: u32) -> Option<&Locale> {
        self.all_locales().iter().find(|l| l.id() == id)
    }
}

/// A fixed, ordered list of locales.
#[derive(Clone, Debug, Default)]
pub struct LocaleTable {
    locales: Vec<Locale>,
}

impl LocaleTable {
    /// Creates a table; enumeration order is the order given.
    pub fn new(locales: Vec<Locale>) -> Self {
        LocaleTable { locales }
    }
    /// The built-in table of Windows locales, ordered by name.
    pub fn windows() -> &'static LocaleTable {
        &WINDOWS_LOCALES
    }
}

impl LocaleService for LocaleTable {
    fn all_locales(&self) -> &[Locale] {
        &self.locales
    }
}

// (name, LCID, default OEM code page)
const WINDOWS_LOCALE_DATA: &[(&str, u32, u32)] = &[
    ("af-ZA", 0x0436, 850),
    ("am-ET", 0x045E, UNICODE_ONLY_CODE_PAGE),
    ("ar-AE", 0x3801, 720),
    ("ar-BH", 0x3C01, 720),
    ("ar-DZ", 0x1401, 720),
    ("ar-EG", 0x0C01, 720),
    ("ar-IQ", 0x0801, 720),
    ("ar-JO", 0x2C01, 720),
    ("ar-KW", 0x3401, 720),
    ("ar-LB", 0x3001, 720),
    ("ar-LY", 0x1001, 720),
    ("ar-MA", 0x1801, 720),
    ("ar-OM", 0x2001, 720),
    ("ar-QA", 0x4001, 720),
    ("ar-SA", 0x0401, 720),
    ("ar-SY", 0x2801, 720),
    ("ar-TN", 0x1C01, 720),
    ("ar-YE", 0x2401, 720),
    ("arn-CL", 0x047A, 850),
    ("as-IN", 0x044D, UNICODE_ONLY_CODE_PAGE),
    ("az-Cyrl-AZ", 0x082C, 866),
    ("az-Latn-AZ", 0x042C, 857),
    ("ba-RU", 0x046D, 866),
    ("be-BY", 0x0423, 866),
    ("bg-BG", 0x0402, 866),
    ("bn-BD", 0x0845, UNICODE_ONLY_CODE_PAGE),
    ("bn-IN", 0x0445, UNICODE_ONLY_CODE_PAGE),
    ("bo-CN", 0x0451, UNICODE_ONLY_CODE_PAGE),
    ("br-FR", 0x047E, 850),
    ("bs-Cyrl-BA", 0x201A, 855),
    ("bs-Latn-BA", 0x141A, 852),
    ("ca-ES", 0x0403, 850),
    ("co-FR", 0x0483, 850),
    ("cs-CZ", 0x0405, 852),
    ("cy-GB", 0x0452, 850),
    ("da-DK", 0x0406, 850),
    ("de-AT", 0x0C07, 850),
    ("de-CH", 0x0807, 850),
    ("de-DE", 0x0407, 850),
    ("de-LI", 0x1407, 850),
    ("de-LU", 0x1007, 850),
    ("dsb-DE", 0x082E, 850),
    ("dv-MV", 0x0465, UNICODE_ONLY_CODE_PAGE),
    ("el-GR", 0x0408, 737),
    ("en-029", 0x2409, 850),
    ("en-AU", 0x0C09, 850),
    ("en-BZ", 0x2809, 850),
    ("en-CA", 0x1009, 850),
    ("en-GB", 0x0809, 850),
    ("en-IE", 0x1809, 850),
    ("en-IN", 0x4009, 437),
    ("en-JM", 0x2009, 850),
    ("en-MY", 0x4409, 437),
    ("en-NZ", 0x1409, 850),
    ("en-PH", 0x3409, 437),
    ("en-SG", 0x4809, 437),
    ("en-TT", 0x2C09, 850),
    ("en-US", 0x0409, 437),
    ("en-ZA", 0x1C09, 437),
    ("en-ZW", 0x3009, 437),
    ("es-AR", 0x2C0A, 850),
    ("es-BO", 0x400A, 850),
    ("es-CL", 0x340A, 850),
    ("es-CO", 0x240A, 850),
    ("es-CR", 0x140A, 850),
    ("es-DO", 0x1C0A, 850),
    ("es-EC", 0x300A, 850),
    ("es-ES", 0x0C0A, 850),
    ("es-GT", 0x100A, 850),
    ("es-HN", 0x480A, 850),
    ("es-MX", 0x080A, 850),
    ("es-NI", 0x4C0A, 850),
    ("es-PA", 0x180A, 850),
    ("es-PE", 0x280A, 850),
    ("es-PR", 0x500A, 850),
    ("es-PY", 0x3C0A, 850),
    ("es-SV", 0x440A, 850),
    ("es-US", 0x540A, 850),
    ("es-UY", 0x380A, 850),
    ("es-VE", 0x200A, 850),
    ("et-EE", 0x0425, 775),
    ("eu-ES", 0x042D, 850),
    ("fa-IR", 0x0429, 720),
    ("fi-FI", 0x040B, 850),
    ("fil-PH", 0x0464, 437),
    ("fo-FO", 0x0438, 850),
    ("fr-BE", 0x080C, 850),
    ("fr-CA", 0x0C0C, 850),
    ("fr-CH", 0x100C, 850),
    ("fr-FR", 0x040C, 850),
    ("fr-LU", 0x140C, 850),
    ("fr-MC", 0x180C, 850),
    ("fy-NL", 0x0462, 850),
    ("ga-IE", 0x083C, 850),
    ("gd-GB", 0x0491, 850),
    ("gl-ES", 0x0456, 850),
    ("gsw-FR", 0x0484, 850),
    ("gu-IN", 0x0447, UNICODE_ONLY_CODE_PAGE),
    ("ha-Latn-NG", 0x0468, 437),
    ("he-IL", 0x040D, 862),
    ("hi-IN", 0x0439, UNICODE_ONLY_CODE_PAGE),
    ("hr-BA", 0x101A, 852),
    ("hr-HR", 0x041A, 852),
    ("hsb-DE", 0x042E, 850),
    ("hu-HU", 0x040E, 852),
    ("hy-AM", 0x042B, UNICODE_ONLY_CODE_PAGE),
    ("id-ID", 0x0421, 850),
    ("ig-NG", 0x0470, 437),
    ("ii-CN", 0x0478, UNICODE_ONLY_CODE_PAGE),
    ("is-IS", 0x040F, 850),
    ("it-CH", 0x0810, 850),
    ("it-IT", 0x0410, 850),
    ("iu-Cans-CA", 0x045D, UNICODE_ONLY_CODE_PAGE),
    ("iu-Latn-CA", 0x085D, 437),
    ("ja-JP", 0x0411, 932),
    ("ka-GE", 0x0437, UNICODE_ONLY_CODE_PAGE),
    ("kk-KZ", 0x043F, 866),
    ("kl-GL", 0x046F, 850),
    ("km-KH", 0x0453, UNICODE_ONLY_CODE_PAGE),
    ("kn-IN", 0x044B, UNICODE_ONLY_CODE_PAGE),
    ("ko-KR", 0x0412, 949),
    ("kok-IN", 0x0457, UNICODE_ONLY_CODE_PAGE),
    ("ky-KG", 0x0440, 866),
    ("lb-LU", 0x046E, 850),
    ("lo-LA", 0x0454, UNICODE_ONLY_CODE_PAGE),
    ("lt-LT", 0x0427, 775),
    ("lv-LV", 0x0426, 775),
    ("mi-NZ", 0x0481, UNICODE_ONLY_CODE_PAGE),
    ("mk-MK", 0x042F, 866),
    ("ml-IN", 0x044C, UNICODE_ONLY_CODE_PAGE),
    ("mn-MN", 0x0450, 866),
    ("mn-Mong-CN", 0x0850, UNICODE_ONLY_CODE_PAGE),
    ("moh-CA", 0x047C, 850),
    ("mr-IN", 0x044E, UNICODE_ONLY_CODE_PAGE),
    ("ms-BN", 0x083E, 850),
    ("ms-MY", 0x043E, 850),
    ("mt-MT", 0x043A, UNICODE_ONLY_CODE_PAGE),
    ("nb-NO", 0x0414, 850),
    ("ne-NP", 0x0461, UNICODE_ONLY_CODE_PAGE),
    ("nl-BE", 0x0813, 850),
    ("nl-NL", 0x0413, 850),
    ("nn-NO", 0x0814, 850),
    ("nso-ZA", 0x046C, 850),
    ("oc-FR", 0x0482, 850),
    ("or-IN", 0x0448, UNICODE_ONLY_CODE_PAGE),
    ("pa-IN", 0x0446, UNICODE_ONLY_CODE_PAGE),
    ("pl-PL", 0x0415, 852),
    ("prs-AF", 0x048C, 720),
    ("ps-AF", 0x0463, UNICODE_ONLY_CODE_PAGE),
    ("pt-BR", 0x0416, 850),
    ("pt-PT", 0x0816, 850),
    ("qut-GT", 0x0486, 850),
    ("quz-BO", 0x046B, 850),
    ("quz-EC", 0x086B, 850),
    ("quz-PE", 0x0C6B, 850),
    ("rm-CH", 0x0417, 850),
    ("ro-RO", 0x0418, 852),
    ("ru-RU", 0x0419, 866),
    ("rw-RW", 0x0487, 437),
    ("sa-IN", 0x044F, UNICODE_ONLY_CODE_PAGE),
    ("sah-RU", 0x0485, 866),
    ("se-FI", 0x0C3B, 850),
    ("se-NO", 0x043B, 850),
    ("se-SE", 0x083B, 850),
    ("si-LK", 0x045B, UNICODE_ONLY_CODE_PAGE),
    ("sk-SK", 0x041B, 852),
    ("sl-SI", 0x0424, 852),
    ("sma-NO", 0x183B, 850),
    ("sma-SE", 0x1C3B, 850),
    ("smj-NO", 0x103B, 850),
    ("smj-SE", 0x143B, 850),
    ("smn-FI", 0x243B, 850),
    ("sms-FI", 0x203B, 850),
    ("sq-AL", 0x041C, 852),
    ("sr-Cyrl-BA", 0x1C1A, 855),
    ("sr-Cyrl-CS", 0x0C1A, 855),
    ("sr-Cyrl-ME", 0x301A, 855),
    ("sr-Cyrl-RS", 0x281A, 855),
    ("sr-Latn-BA", 0x181A, 852),
    ("sr-Latn-CS", 0x081A, 852),
    ("sr-Latn-ME", 0x2C1A, 852),
    ("sr-Latn-RS", 0x241A, 852),
    ("sv-FI", 0x081D, 850),
    ("sv-SE", 0x041D, 850),
    ("sw-KE", 0x0441, 437),
    ("syr-SY", 0x045A, UNICODE_ONLY_CODE_PAGE),
    ("ta-IN", 0x0449, UNICODE_ONLY_CODE_PAGE),
    ("te-IN", 0x044A, UNICODE_ONLY_CODE_PAGE),
    ("tg-Cyrl-TJ", 0x0428, 866),
    ("th-TH", 0x041E, 874),
    ("tk-TM", 0x0442, 852),
    ("tn-ZA", 0x0432, 850),
    ("tr-TR", 0x041F, 857),
    ("tt-RU", 0x0444, 866),
    ("tzm-Latn-DZ", 0x085F, 850),
    ("ug-CN", 0x0480, UNICODE_ONLY_CODE_PAGE),
    ("uk-UA", 0x0422, 866),
    ("ur-PK", 0x0420, 720),
    ("uz-Cyrl-UZ", 0x0843, 866),
    ("uz-Latn-UZ", 0x0443, 857),
    ("vi-VN", 0x042A, 1258),
    ("wo-SN", 0x0488, 850),
    ("xh-ZA", 0x0434, 850),
    ("yo-NG", 0x046A, 437),
    ("zh-CN", 0x0804, 936),
    ("zh-HK", 0x0C04, 950),
    ("zh-MO", 0x1404, 950),
    ("zh-SG", 0x1004, 936),
    ("zh-TW", 0x0404, 950),
    ("zu-ZA", 0x0435, 850),
];

static WINDOWS_LOCALES: Lazy<LocaleTable> = Lazy::new(|| {
    let mut locales = WINDOWS_LOCALE_DATA
        .iter()
        .filter_map(|&(name, id, code_page)| Locale::new(id, name, code_page))
        .collect::<Vec<_>>();
    locales.sort_by(|a, b| a.name.cmp(&b.name));
    LocaleTable::new(locales)
});
