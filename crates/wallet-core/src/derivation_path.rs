use std::fmt;
use std::str::FromStr;

use crate::error::KeyDerivationError;

/// Offset added to an index to mark it hardened.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// One path segment. `index` is always below [`HARDENED_OFFSET`]; hardening
/// is carried in the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildIndex {
    pub index: u32,
    pub hardened: bool,
}

impl ChildIndex {
    pub fn hardened(index: u32) -> Self {
        Self {
            index,
            hardened: true,
        }
    }

    pub fn normal(index: u32) -> Self {
        Self {
            index,
            hardened: false,
        }
    }

    /// Index as fed to the keyed hash, with the hardened bit applied.
    pub fn raw(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)?;
        if self.hardened {
            f.write_str("'")?;
        }
        Ok(())
    }
}

/// Parsed `m/44'/501'/0'/0'` style path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    pub fn new(segments: Vec<ChildIndex>) -> Self {
        Self(segments)
    }

    /// `m/44'/501'/{account}'/{change}'`
    pub fn default_solana(account: u32, change: u32) -> Self {
        Self(vec![
            ChildIndex::hardened(44),
            ChildIndex::hardened(501),
            ChildIndex::hardened(account),
            ChildIndex::hardened(change),
        ])
    }

    pub fn segments(&self) -> &[ChildIndex] {
        &self.0
    }

    pub fn is_fully_hardened(&self) -> bool {
        self.0.iter().all(|segment| segment.hardened)
    }
}

impl FromStr for DerivationPath {
    type Err = KeyDerivationError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| KeyDerivationError::InvalidDerivationPath(reason);

        if path.is_empty() {
            return Err(invalid("empty path".into()));
        }

        let rest = match path.strip_prefix('m') {
            Some("") => return Ok(Self::default()),
            Some(rest) => rest
                .strip_prefix('/')
                .ok_or_else(|| invalid(format!("expected '/' after 'm' in {path:?}")))?,
            None => path,
        };

        rest.split('/')
            .map(|component| {
                let (digits, hardened) = match component
                    .strip_suffix('\'')
                    .or_else(|| component.strip_suffix('h'))
                {
                    Some(digits) => (digits, true),
                    None => (component, false),
                };

                if digits.is_empty() {
                    return Err(invalid(format!("empty segment in {path:?}")));
                }
                if !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid(format!("non-numeric segment {component:?}")));
                }
                let index: u32 = digits
                    .parse()
                    .map_err(|_| invalid(format!("segment {component:?} out of range")))?;
                if index >= HARDENED_OFFSET {
                    return Err(invalid(format!("segment {component:?} out of range")));
                }

                Ok(ChildIndex { index, hardened })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hardened_markers() {
        let path: DerivationPath = "m/44'/501h/0'/0".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                ChildIndex::hardened(44),
                ChildIndex::hardened(501),
                ChildIndex::hardened(0),
                ChildIndex::normal(0),
            ]
        );
        assert!(!path.is_fully_hardened());
    }

    #[test]
    fn leading_m_is_optional() {
        let with_m: DerivationPath = "m/44'/501'".parse().unwrap();
        let without: DerivationPath = "44'/501'".parse().unwrap();
        assert_eq!(with_m, without);
    }

    #[test]
    fn bare_m_is_the_root() {
        let path: DerivationPath = "m".parse().unwrap();
        assert!(path.segments().is_empty());
        assert_eq!(path.to_string(), "m");
    }

    #[test]
    fn display_is_canonical() {
        let path: DerivationPath = "44h/501h/3h/0".parse().unwrap();
        assert_eq!(path.to_string(), "m/44'/501'/3'/0");
        assert_eq!(DerivationPath::default_solana(2, 0).to_string(), "m/44'/501'/2'/0'");
    }

    #[test]
    fn rejects_malformed_paths() {
        for bad in ["", "m/", "m//0'", "m/44'/", "m/abc", "m/-1", "m/+1", "x/44'", "m44'", "m/2147483648"] {
            assert!(
                matches!(
                    bad.parse::<DerivationPath>(),
                    Err(KeyDerivationError::InvalidDerivationPath(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn largest_index_is_accepted() {
        let path: DerivationPath = "m/2147483647'".parse().unwrap();
        assert_eq!(path.segments()[0].raw(), u32::MAX);
    }
}
