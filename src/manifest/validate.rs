use super::parser::Manifest;
use super::requirement::{Comparator, Constraint, Requirement};
use super::version::Version;
use crate::utils::error::{PlaygroundError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// 同一套件在多行出現，且版本範圍沒有交集
    Conflict {
        name: String,
        lines: Vec<usize>,
        constraints: Vec<String>,
    },
    /// 同一套件重複出現，但版本範圍仍可同時滿足
    Duplicate { name: String, lines: Vec<usize> },
    /// 單行規格本身就無法滿足 (例如 `>=2,<1`)
    Unsatisfiable {
        name: String,
        line: usize,
        constraints: Vec<String>,
    },
}

impl Issue {
    pub fn severity(&self) -> IssueSeverity {
        match self {
            Issue::Duplicate { .. } => IssueSeverity::Warning,
            Issue::Conflict { .. } | Issue::Unsatisfiable { .. } => IssueSeverity::Error,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::Conflict {
                name,
                lines,
                constraints,
            } => write!(
                f,
                "conflicting constraints for '{}' on lines {}: {}",
                name,
                join_lines(lines),
                constraints.join(" vs ")
            ),
            Issue::Duplicate { name, lines } => write!(
                f,
                "'{}' is listed more than once (lines {})",
                name,
                join_lines(lines)
            ),
            Issue::Unsatisfiable {
                name,
                line,
                constraints,
            } => write!(
                f,
                "constraints for '{}' on line {} can never be met: {}",
                name,
                line,
                constraints.join(",")
            ),
        }
    }
}

fn join_lines(lines: &[usize]) -> String {
    lines
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub requirement_count: usize,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == IssueSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == IssueSeverity::Warning)
    }

    pub fn into_result(self) -> Result<Self> {
        let error_count = self.errors().count();
        if error_count == 0 {
            return Ok(self);
        }
        Err(PlaygroundError::ValidationError {
            message: format!(
                "{} error(s) in {} requirement(s)",
                error_count, self.requirement_count
            ),
        })
    }
}

/// 檢查清單：每個套件名稱 (正規化後) 的所有版本限制必須可以同時滿足
pub fn validate(manifest: &Manifest) -> ValidationReport {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<(usize, &Requirement)>> = HashMap::new();
    let mut report = ValidationReport::default();

    for (line, req) in manifest.requirements() {
        report.requirement_count += 1;

        let own: Vec<&Constraint> = req.constraints.iter().collect();
        if !is_satisfiable(&own) {
            tracing::debug!("Line {}: '{}' is unsatisfiable on its own", line, req);
            report.issues.push(Issue::Unsatisfiable {
                name: req.name.clone(),
                line,
                constraints: req.constraints.iter().map(Constraint::to_string).collect(),
            });
        }

        let key = req.normalized_name();
        let group = groups.entry(key.clone()).or_default();
        if group.is_empty() {
            order.push(key);
        }
        group.push((line, req));
    }

    for key in order {
        let group = &groups[&key];
        if group.len() < 2 {
            continue;
        }

        let lines: Vec<usize> = group.iter().map(|(line, _)| *line).collect();
        let combined: Vec<&Constraint> = group
            .iter()
            .flat_map(|(_, req)| req.constraints.iter())
            .collect();

        if is_satisfiable(&combined) {
            report.issues.push(Issue::Duplicate { name: key, lines });
        } else {
            let constraints = group
                .iter()
                .map(|(_, req)| describe_constraints(req))
                .collect();
            report.issues.push(Issue::Conflict {
                name: key,
                lines,
                constraints,
            });
        }
    }

    tracing::debug!(
        "Validated {} requirement(s), {} issue(s)",
        report.requirement_count,
        report.issues.len()
    );
    report
}

fn describe_constraints(req: &Requirement) -> String {
    if req.constraints.is_empty() {
        return "any".to_string();
    }
    req.constraints
        .iter()
        .map(Constraint::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone)]
struct Bound {
    version: Version,
    inclusive: bool,
}

/// 判斷一組限制是否存在共同可接受的版本
///
/// 版本空間視為稠密：兩個不同版本之間永遠還有其他版本，所以只有在上下界相等時
/// 才需要考慮 `!=` 排除。版本不會是負數，所以下界從 `>=0` 開始。
pub fn is_satisfiable(constraints: &[&Constraint]) -> bool {
    let mut lower = Some(Bound {
        version: Version::new(vec![0]),
        inclusive: true,
    });
    let mut upper: Option<Bound> = None;
    let mut pins: Vec<&Version> = Vec::new();
    let mut excluded: Vec<&Version> = Vec::new();

    for constraint in constraints {
        let version = &constraint.version;
        match constraint.op {
            Comparator::Ge => raise_lower(&mut lower, version.clone(), true),
            Comparator::Gt => raise_lower(&mut lower, version.clone(), false),
            Comparator::Le => drop_upper(&mut upper, version.clone(), true),
            Comparator::Lt => drop_upper(&mut upper, version.clone(), false),
            Comparator::Eq => pins.push(version),
            Comparator::Ne => excluded.push(version),
            Comparator::Compatible => {
                raise_lower(&mut lower, version.clone(), true);
                if let Some(bound) = version.compatible_upper_bound() {
                    drop_upper(&mut upper, bound, false);
                }
            }
        }
    }

    if let Some(pin) = pins.first() {
        return constraints.iter().all(|c| c.matches(pin));
    }

    match (lower, upper) {
        (Some(lo), Some(hi)) => {
            if lo.version < hi.version {
                true
            } else if lo.version == hi.version {
                lo.inclusive && hi.inclusive && !excluded.contains(&&lo.version)
            } else {
                false
            }
        }
        _ => true,
    }
}

fn raise_lower(current: &mut Option<Bound>, version: Version, inclusive: bool) {
    let tighter = match current {
        None => true,
        Some(bound) => {
            version > bound.version || (version == bound.version && !inclusive)
        }
    };
    if tighter {
        *current = Some(Bound { version, inclusive });
    }
}

fn drop_upper(current: &mut Option<Bound>, version: Version, inclusive: bool) {
    let tighter = match current {
        None => true,
        Some(bound) => {
            version < bound.version || (version == bound.version && !inclusive)
        }
    };
    if tighter {
        *current = Some(Bound { version, inclusive });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraints(specs: &[&str]) -> Vec<Constraint> {
        specs.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn satisfiable(specs: &[&str]) -> bool {
        let owned = constraints(specs);
        let refs: Vec<&Constraint> = owned.iter().collect();
        is_satisfiable(&refs)
    }

    #[test]
    fn test_satisfiable_ranges() {
        assert!(satisfiable(&[]));
        assert!(satisfiable(&[">=1.0", "<2.0"]));
        assert!(satisfiable(&[">=1.0", "<=1.0"]));
        assert!(satisfiable(&["~=1.4.2", ">=1.4.5"]));
        assert!(satisfiable(&["==1.2.0", ">=1.0", "!=1.3"]));
    }

    #[test]
    fn test_unsatisfiable_ranges() {
        assert!(!satisfiable(&[">=2.0", "<1.0"]));
        assert!(!satisfiable(&[">1.0", "<=1.0"]));
        assert!(!satisfiable(&[">=1.0", "<=1.0", "!=1.0"]));
        assert!(!satisfiable(&["==1.0", "==2.0"]));
        assert!(!satisfiable(&["~=1.4", ">=2.0"]));
        assert!(!satisfiable(&["==1.0", "!=1.0.0"]));
        assert!(!satisfiable(&["<0"]));
        assert!(!satisfiable(&["<0.0"]));
        assert!(!satisfiable(&["<=0", "!=0"]));
    }

    #[test]
    fn test_zero_is_the_lowest_version() {
        assert!(satisfiable(&["<=0"]));
        assert!(satisfiable(&["<0.1", "!=0"]));

        let report = validate(&Manifest::parse("foo<0
").unwrap());
        assert!(!report.is_ok());
        assert!(matches!(report.issues[0], Issue::Unsatisfiable { line: 1, .. }));
    }

    #[test]
    fn test_overflowing_compatible_release_fails_to_parse() {
        let err = Manifest::parse("mcp>=1.0\nfoo~=18446744073709551615.0\n").unwrap_err();
        assert!(matches!(err, PlaygroundError::ManifestParseError { line: 2, .. }));
    }

    #[test]
    fn test_clean_manifest_passes() {
        let manifest =
            Manifest::parse("mcp>=1.0.0\npydantic>=2.0.0\n\n# Testing\npytest>=7.0\n").unwrap();
        let report = validate(&manifest);
        assert!(report.is_ok());
        assert!(report.issues.is_empty());
        assert_eq!(report.requirement_count, 3);
    }

    #[test]
    fn test_conflict_across_lines() {
        let manifest = Manifest::parse("openai>=1.0.0\nanthropic>=0.20\nOpenAI<1.0\n").unwrap();
        let report = validate(&manifest);

        assert!(!report.is_ok());
        assert_eq!(
            report.issues,
            vec![Issue::Conflict {
                name: "openai".to_string(),
                lines: vec![1, 3],
                constraints: vec![">=1.0.0".to_string(), "<1.0".to_string()],
            }]
        );
        assert!(report.into_result().is_err());
    }

    #[test]
    fn test_compatible_duplicate_is_warning() {
        let manifest = Manifest::parse("pytest>=7.0\npytest_asyncio\npytest<9\n").unwrap();
        let report = validate(&manifest);

        assert!(report.is_ok());
        assert_eq!(report.warnings().count(), 1);
        assert!(report.issues[0].to_string().contains("lines 1, 3"));
    }

    #[test]
    fn test_self_contradicting_line() {
        let manifest = Manifest::parse("black>=24,<23\n").unwrap();
        let report = validate(&manifest);
        assert_eq!(report.errors().count(), 1);
        assert!(matches!(report.issues[0], Issue::Unsatisfiable { line: 1, .. }));
    }
}
