//! Shareable seed URLs: `<base>?<options>,<checksum>,<seed>`.

use crate::constants::{options_for_url, url_for_options, BASE_URL, DEFAULT_OPTIONS, DEV_BASE_URL};
use crate::{RandomiserError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedUrl {
    /// Options string, not yet parsed.
    pub options: String,
    pub checksum: Option<u32>,
    pub seed: String,
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(byte, b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')')
}

pub fn percent_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        if is_unreserved(byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

pub fn percent_decode(text: &str) -> Result<String> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = text
                .get(i + 1..i + 3)
                .ok_or_else(|| RandomiserError::InvalidUrl(format!("truncated escape in {}", text)))?;
            let byte = u8::from_str_radix(hex, 16)
                .map_err(|_| RandomiserError::InvalidUrl(format!("bad escape %{}", hex)))?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|err| RandomiserError::InvalidUrl(err.to_string()))
}

/// Build a seed URL. `options` is a canonical options string.
pub fn options_to_url(
    version: &str,
    options: &str,
    checksum: Option<u32>,
    seed: &str,
    base: Option<&str>,
) -> String {
    let mut args: Vec<String> = Vec::new();
    let base = if version.contains('-') {
        if options != DEFAULT_OPTIONS {
            args.push(options.to_string());
        }
        DEV_BASE_URL
    } else {
        match base {
            None => match url_for_options(options) {
                Some(url) => url,
                None => {
                    args.push(options.to_string());
                    BASE_URL
                }
            },
            Some(base) if base == BASE_URL => match url_for_options(options) {
                Some(url) => url,
                None => {
                    args.push(options.to_string());
                    BASE_URL
                }
            },
            Some(base) => {
                args.push(options.to_string());
                base
            }
        }
    };
    args.push(checksum.map(|sum| format!("{:x}", sum)).unwrap_or_default());
    args.push(percent_encode(seed));
    if args.iter().all(|arg| arg.is_empty()) {
        return base.to_string();
    }
    format!("{}?{}", base, args.join(","))
}

/// Split a seed URL back into its parts.
pub fn options_from_url(url: &str) -> Result<SeedUrl> {
    let url = url.split('#').next().unwrap_or(url);
    let (base, query) = url
        .split_once('?')
        .ok_or_else(|| RandomiserError::InvalidUrl(format!("no query in {}", url)))?;
    let mut args: Vec<&str> = query.split(',').collect();
    let encoded_seed = args.pop().unwrap_or("");
    let seed = percent_decode(encoded_seed)?;
    if seed.is_empty() {
        return Err(RandomiserError::InvalidUrl(format!("no seed in {}", url)));
    }
    let checksum = match args.pop() {
        None | Some("") => None,
        Some(hex) => Some(
            u32::from_str_radix(hex, 16)
                .map_err(|_| RandomiserError::InvalidUrl(format!("bad checksum {}", hex)))?,
        ),
    };
    let options = if !args.is_empty() {
        args.join(",")
    } else if let Some(options) = options_for_url(base) {
        options.to_string()
    } else {
        DEFAULT_OPTIONS.to_string()
    };
    Ok(SeedUrl {
        options,
        checksum,
        seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_options_use_dedicated_urls() {
        let url = options_to_url("1.2.0", "p:og", Some(0x1a2), "my seed", None);
        assert_eq!(url, "https://og.sotn.io/?1a2,my%20seed");
        let parts = options_from_url(&url).unwrap();
        assert_eq!(parts.options, "p:og");
        assert_eq!(parts.checksum, Some(0x1a2));
        assert_eq!(parts.seed, "my seed");
    }

    #[test]
    fn custom_options_ride_in_the_query() {
        let url = options_to_url("1.2.0", "d:Zombie:Heart,s", None, "abc", None);
        assert_eq!(url, "https://sotn.io/?d:Zombie:Heart,s,,abc");
        let parts = options_from_url(&url).unwrap();
        assert_eq!(parts.options, "d:Zombie:Heart,s");
        assert_eq!(parts.checksum, None);
        assert_eq!(parts.seed, "abc");
    }

    #[test]
    fn development_versions_use_the_dev_host() {
        let url = options_to_url("1.2.0-rc1", DEFAULT_OPTIONS, Some(0xfff), "s", None);
        assert_eq!(url, "https://dev.sotn.io/?fff,s");
        assert_eq!(options_from_url(&url).unwrap().options, DEFAULT_OPTIONS);
    }

    #[test]
    fn explicit_bases_keep_options() {
        let url = options_to_url("1.0.0", "p:og", None, "x", Some("http://localhost/"));
        assert_eq!(url, "http://localhost/?p:og,,x");
    }

    #[test]
    fn seeds_are_percent_encoded() {
        assert_eq!(percent_encode("a b,c/ü"), "a%20b%2Cc%2F%C3%BC");
        assert_eq!(percent_decode("a%20b%2Cc%2F%C3%BC").unwrap(), "a b,c/ü");
    }

    #[test]
    fn malformed_urls_fail() {
        assert!(matches!(
            options_from_url("https://sotn.io/"),
            Err(RandomiserError::InvalidUrl(_))
        ));
        assert!(matches!(
            options_from_url("https://sotn.io/?p:og,1a2,"),
            Err(RandomiserError::InvalidUrl(_))
        ));
        assert!(options_from_url("https://sotn.io/?zz,seed").is_err());
    }
}
