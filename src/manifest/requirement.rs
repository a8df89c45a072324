use super::version::Version;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[([^\]]*)\])?\s*(.*)$")
        .expect("requirement name pattern is valid")
});

static CONSTRAINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(~=|==|!=|>=|<=|>|<)\s*(\S+)$").expect("constraint pattern is valid")
});

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("separator pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    Ge,
    Gt,
    Le,
    Lt,
    Eq,
    Ne,
    Compatible,
}

impl Comparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Ge => ">=",
            Comparator::Gt => ">",
            Comparator::Le => "<=",
            Comparator::Lt => "<",
            Comparator::Eq => "==",
            Comparator::Ne => "!=",
            Comparator::Compatible => "~=",
        }
    }
}

impl FromStr for Comparator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">=" => Ok(Comparator::Ge),
            ">" => Ok(Comparator::Gt),
            "<=" => Ok(Comparator::Le),
            "<" => Ok(Comparator::Lt),
            "==" => Ok(Comparator::Eq),
            "!=" => Ok(Comparator::Ne),
            "~=" => Ok(Comparator::Compatible),
            other => Err(format!("Unknown comparator '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub op: Comparator,
    pub version: Version,
}

impl Constraint {
    pub fn matches(&self, candidate: &Version) -> bool {
        match self.op {
            Comparator::Ge => candidate >= &self.version,
            Comparator::Gt => candidate > &self.version,
            Comparator::Le => candidate <= &self.version,
            Comparator::Lt => candidate < &self.version,
            Comparator::Eq => candidate == &self.version,
            Comparator::Ne => candidate != &self.version,
            Comparator::Compatible => match self.version.compatible_upper_bound() {
                Some(upper) => candidate >= &self.version && candidate < &upper,
                None => false,
            },
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.as_str(), self.version)
    }
}

impl FromStr for Constraint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let caps = CONSTRAINT_RE
            .captures(s)
            .ok_or_else(|| format!("Invalid version constraint '{}'", s))?;

        let op: Comparator = caps[1].parse()?;
        let version: Version = caps[2].parse()?;

        if op == Comparator::Compatible {
            if version.release.len() < 2 {
                return Err(format!(
                    "'~=' needs at least two version segments, got '{}'",
                    version
                ));
            }
            if version.compatible_upper_bound().is_none() {
                return Err(format!("'~={}' has no representable upper bound", version));
            }
        }

        Ok(Constraint { op, version })
    }
}

/// 清單中的一行套件規格，例如 `mcp[cli]>=1.2.0  # protocol client`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    pub extras: Vec<String>,
    pub constraints: Vec<Constraint>,
    pub marker: Option<String>,
    pub comment: Option<String>,
    pub section: Option<String>,
}

impl Requirement {
    /// PEP 503 正規化名稱：小寫，並把連續的 `-_.` 合併成 `-`
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn allows(&self, candidate: &Version) -> bool {
        self.constraints.iter().all(|c| c.matches(candidate))
    }
}

pub fn normalize_name(name: &str) -> String {
    SEPARATOR_RE.replace_all(&name.to_lowercase(), "-").into_owned()
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        let constraints: Vec<String> = self.constraints.iter().map(Constraint::to_string).collect();
        write!(f, "{}", constraints.join(","))?;
        if let Some(marker) = &self.marker {
            write!(f, "; {}", marker)?;
        }
        Ok(())
    }
}

impl FromStr for Requirement {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (spec, comment) = match line.split_once('#') {
            Some((spec, comment)) => (spec, Some(comment.trim().to_string())),
            None => (line, None),
        };
        let comment = comment.filter(|c| !c.is_empty());

        let (spec, marker) = match spec.split_once(';') {
            Some((spec, marker)) => {
                let marker = marker.trim();
                if marker.is_empty() {
                    return Err("Empty environment marker after ';'".to_string());
                }
                (spec, Some(marker.to_string()))
            }
            None => (spec, None),
        };

        let spec = spec.trim();
        if spec.is_empty() {
            return Err("Missing package name".to_string());
        }

        let caps = NAME_RE
            .captures(spec)
            .ok_or_else(|| format!("Invalid package name in '{}'", spec))?;

        let name = caps[1].to_string();

        let extras = match caps.get(2) {
            Some(group) => {
                let extras: Vec<String> = group
                    .as_str()
                    .split(',')
                    .map(|e| e.trim().to_string())
                    .collect();
                if extras.iter().any(|e| e.is_empty()) {
                    return Err(format!("Empty extra in '{}'", spec));
                }
                extras
            }
            None => Vec::new(),
        };

        let rest = caps.get(3).map(|m| m.as_str().trim()).unwrap_or("");
        let constraints = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(',')
                .map(str::parse::<Constraint>)
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Requirement {
            name,
            extras,
            constraints,
            marker,
            comment,
            section: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimum_version_with_comment() {
        let req: Requirement = "pydantic>=2.0.0  # data validation".parse().unwrap();
        assert_eq!(req.name, "pydantic");
        assert_eq!(req.constraints.len(), 1);
        assert_eq!(req.constraints[0].op, Comparator::Ge);
        assert_eq!(req.comment.as_deref(), Some("data validation"));
    }

    #[test]
    fn test_parse_bare_name() {
        let req: Requirement = "pytest".parse().unwrap();
        assert!(req.constraints.is_empty());
        assert!(req.allows(&"99.0".parse().unwrap()));
    }

    #[test]
    fn test_parse_extras_marker_and_ranges() {
        let req: Requirement = "mcp[cli, ws] >=1.2, <2 ; python_version >= '3.10'"
            .parse()
            .unwrap();
        assert_eq!(req.extras, vec!["cli", "ws"]);
        assert_eq!(req.constraints.len(), 2);
        assert_eq!(req.marker.as_deref(), Some("python_version >= '3.10'"));
        assert_eq!(req.to_string(), "mcp[cli,ws]>=1.2,<2; python_version >= '3.10'");
    }

    #[test]
    fn test_rejects_malformed_specifiers() {
        assert!("requests>>1.0".parse::<Requirement>().is_err());
        assert!("-bad-name".parse::<Requirement>().is_err());
        assert!("openai>=".parse::<Requirement>().is_err());
        assert!("anthropic~=1".parse::<Requirement>().is_err());
        assert!("foo[]".parse::<Requirement>().is_err());
        assert!("flake8 2.0".parse::<Requirement>().is_err());
    }

    #[test]
    fn test_compatible_release_matching() {
        let c: Constraint = "~=1.4.2".parse().unwrap();
        assert!(c.matches(&"1.4.9".parse().unwrap()));
        assert!(!c.matches(&"1.5".parse().unwrap()));
        assert!(!c.matches(&"1.4.1".parse().unwrap()));
    }

    #[test]
    fn test_compatible_release_overflow_is_rejected() {
        let err = "~=18446744073709551615.0".parse::<Constraint>().unwrap_err();
        assert!(err.contains("upper bound"));
        assert!("foo~=18446744073709551615.0".parse::<Requirement>().is_err());
        assert!("foo~=18446744073709551614.0".parse::<Requirement>().is_ok());
    }

    #[test]
    fn test_normalized_name() {
        assert_eq!(normalize_name("Google_Generative.AI"), "google-generative-ai");
        assert_eq!(normalize_name("pytest--asyncio"), "pytest-asyncio");
    }
}
