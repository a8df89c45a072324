use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// 版本號，只處理數字發行段 (例如 `1.4.2`)
///
/// 比較時較短的一方以 0 補齊，所以 `1.0` 與 `1.0.0` 相等。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub release: Vec<u64>,
}

impl Version {
    pub fn new(release: Vec<u64>) -> Self {
        Self { release }
    }

    /// `~=` 的上界：去掉最後一段，再把剩下的最後一段加一
    ///
    /// 少於兩段，或加一會溢位時回傳 `None`。
    pub fn compatible_upper_bound(&self) -> Option<Version> {
        if self.release.len() < 2 {
            return None;
        }
        let mut prefix = self.release[..self.release.len() - 1].to_vec();
        let last = prefix.last_mut()?;
        *last = last.checked_add(1)?;
        Some(Version::new(prefix))
    }

    fn segment(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        (0..len)
            .map(|i| self.segment(i).cmp(&other.segment(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.release.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Version cannot be empty".to_string());
        }

        let release = s
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| format!("Invalid version segment '{}' in '{}'", part, s))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Version::new(release))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(v("1.20.3").release, vec![1, 20, 3]);
        assert_eq!(v("2.0").to_string(), "2.0");
    }

    #[test]
    fn test_zero_padded_comparison() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert!(v("1.10") > v("1.9.9"));
        assert!(v("0.9") < v("1"));
    }

    #[test]
    fn test_invalid_versions() {
        assert!("".parse::<Version>().is_err());
        assert!("1..2".parse::<Version>().is_err());
        assert!("1.0a1".parse::<Version>().is_err());
    }

    #[test]
    fn test_compatible_upper_bound() {
        assert_eq!(v("1.4.2").compatible_upper_bound(), Some(v("1.5")));
        assert_eq!(v("2.1").compatible_upper_bound(), Some(v("3")));
        assert_eq!(v("3").compatible_upper_bound(), None);
    }

    #[test]
    fn test_compatible_upper_bound_overflow() {
        assert_eq!(v("18446744073709551615.0").compatible_upper_bound(), None);
        assert_eq!(
            v("1.18446744073709551615.3").compatible_upper_bound(),
            None
        );
        assert_eq!(
            v("18446744073709551614.0").compatible_upper_bound(),
            Some(v("18446744073709551615"))
        );
    }
}
