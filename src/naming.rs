//! Stored-file and slug naming for uploaded pictures.
//!
//! Every upload gets a fresh uniqueness token, and all three names derive
//! from it:
//!
//! - `Sunset.jpg`, "My Sunset", token `0192…` →
//!   - stored file: `sunset-0192….jpg`
//!   - thumbnail:   `sunset-0192…-thumb.jpg`
//!   - slug name:   `my-sunset-0192…`
//!
//! ## Slugs
//!
//! Slugs contain only `a-z`, `0-9` and single hyphens, with no leading or
//! trailing hyphen. Common Latin accented letters are transliterated
//! (`é` → `e`, `ß` → `ss`); every other character acts as a word separator.
//!
//! ## Tokens
//!
//! The default [`UuidTokens`] source emits UUID v7 values as 32 hex digits:
//! a millisecond timestamp followed by 74 random bits, so two uploads
//! colliding would need the same millisecond *and* the same random draw.

use crate::imaging::canonical_extension;
use thiserror::Error;
use uuid::Uuid;

/// Longest slugged stem kept from a client filename or display name.
///
/// Leaves room for the token, `-thumb` and the extension within the usual
/// 255-byte filename limit.
const MAX_STEM_LEN: usize = 96;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NamingError {
    #[error("Unsupported file type for {file:?} (expected a JPEG or PNG image)")]
    UnsupportedExtension { file: String },
    #[error("Token source produced an unusable token: {0:?}")]
    InvalidToken(String),
}

/// A source of per-upload uniqueness tokens.
pub trait TokenSource: Send + Sync {
    fn next_token(&self) -> String;
}

/// UUID v7 tokens rendered as 32 lowercase hex digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokens;

impl TokenSource for UuidTokens {
    fn next_token(&self) -> String {
        Uuid::now_v7().simple().to_string()
    }
}

/// The three names derived for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSet {
    pub stored_file_name: String,
    pub thumb_file_name: String,
    pub slug_name: String,
}

/// Derives a [`NameSet`] per upload from a [`TokenSource`].
#[derive(Debug, Default)]
pub struct Namer<T = UuidTokens> {
    tokens: T,
}

impl<T: TokenSource> Namer<T> {
    pub fn new(tokens: T) -> Self {
        Self { tokens }
    }

    /// Name an upload.
    ///
    /// `extension` is whatever the caller detected for the file (content
    /// sniffing or declared extension); it must be an accepted upload format.
    /// No filesystem access happens here.
    pub fn name(
        &self,
        original_file_name: &str,
        display_name: &str,
        extension: Option<&str>,
    ) -> Result<NameSet, NamingError> {
        let extension = extension.and_then(canonical_extension).ok_or_else(|| {
            NamingError::UnsupportedExtension {
                file: original_file_name.to_string(),
            }
        })?;

        let raw_token = self.tokens.next_token();
        let token = slugify(&raw_token);
        if token.is_empty() {
            return Err(NamingError::InvalidToken(raw_token));
        }

        let stem = join_slug(
            &truncate_slug(&slugify(base_name(original_file_name))),
            &token,
        );
        // Same as slugify(display_name + "-" + token), since the token is
        // already a slug and '-' is a separator.
        let slug_name = join_slug(&truncate_slug(&slugify(display_name)), &token);

        Ok(NameSet {
            stored_file_name: format!("{stem}.{extension}"),
            thumb_file_name: format!("{stem}-thumb.{extension}"),
            slug_name,
        })
    }
}

/// Filename without directory components or its last extension.
///
/// Both `/` and `\` count as separators since client filenames come from
/// any platform. A leading dot is part of the name, not an extension.
pub fn base_name(original: &str) -> &str {
    let file = file_name(original);
    match file.rfind('.') {
        Some(pos) if pos > 0 => &file[..pos],
        _ => file,
    }
}

/// Extension declared by a client filename, without the dot.
pub fn declared_extension(original: &str) -> Option<&str> {
    let file = file_name(original);
    match file.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < file.len() => Some(&file[pos + 1..]),
        _ => None,
    }
}

fn file_name(original: &str) -> &str {
    original.rsplit(['/', '\\']).next().unwrap_or(original)
}

/// Convert arbitrary text to a lowercase ASCII slug.
///
/// `"Émile's  Café!"` → `"emile-s-cafe"`. Returns an empty string when
/// nothing sluggable remains.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut separator = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        let mut buf = [0u8; 4];
        let piece: &str = if c.is_ascii_alphanumeric() {
            c.encode_utf8(&mut buf)
        } else if is_combining_mark(c) {
            // Decomposed accents: "e\u{301}" slugs like "é"
            continue;
        } else if let Some(ascii) = transliterate(c) {
            ascii
        } else {
            separator = true;
            continue;
        };

        if separator && !slug.is_empty() {
            slug.push('-');
        }
        separator = false;
        slug.push_str(piece);
    }

    slug
}

fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036F}')
}

/// ASCII spelling of common lowercase Latin letters outside ASCII.
fn transliterate(c: char) -> Option<&'static str> {
    Some(match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ģ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ř' => "r",
        'ś' | 'ş' | 'š' | 'ș' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ț' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    })
}

/// Cut a slug to [`MAX_STEM_LEN`] without leaving a trailing hyphen.
fn truncate_slug(slug: &str) -> String {
    // Slugs are ASCII, so byte slicing is char-safe.
    let cut = &slug[..slug.len().min(MAX_STEM_LEN)];
    cut.trim_end_matches('-').to_string()
}

fn join_slug(prefix: &str, token: &str) -> String {
    match (prefix.is_empty(), token.is_empty()) {
        (true, _) => token.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}-{token}"),
    }
}
