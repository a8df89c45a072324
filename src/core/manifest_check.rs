use crate::manifest::{validate, IssueSeverity, Manifest, ValidationReport};
use crate::utils::error::{PlaygroundError, Result};
use std::path::{Path, PathBuf};

/// 讀取、解析並驗證相依清單
pub struct ManifestChecker {
    path: PathBuf,
    strict: bool,
}

impl ManifestChecker {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            strict: false,
        }
    }

    /// 嚴格模式下，重複列出的套件也算失敗
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// 解析並驗證；只有讀檔或解析失敗才回傳錯誤
    pub fn run(&self) -> Result<ValidationReport> {
        tracing::info!("Checking manifest {}", self.path.display());

        let manifest = Manifest::from_file(&self.path)?;
        let sections = manifest.sections();
        if !sections.is_empty() {
            tracing::debug!("Sections: {}", sections.join(", "));
        }

        let report = validate(&manifest);
        for issue in &report.issues {
            match issue.severity() {
                IssueSeverity::Error => tracing::error!("{}", issue),
                IssueSeverity::Warning => tracing::warn!("{}", issue),
            }
        }

        tracing::info!(
            "{} requirement(s) checked, {} issue(s)",
            report.requirement_count,
            report.issues.len()
        );
        Ok(report)
    }

    /// 有錯誤 (嚴格模式下含警告) 時轉成 `ValidationError`
    pub fn enforce(&self, report: ValidationReport) -> Result<ValidationReport> {
        let warnings = report.warnings().count();
        if self.strict && warnings > 0 {
            return Err(PlaygroundError::ValidationError {
                message: format!("{} duplicate requirement(s) in strict mode", warnings),
            });
        }
        report.into_result()
    }

    pub fn check(&self) -> Result<ValidationReport> {
        let report = self.run()?;
        self.enforce(report)
    }
}
