//! Build plan and outcome reports.
//!
//! A [`BuildPlan`] is what the compile/link collaborator consumes: the
//! project identity, the outcome, and for a passing script every target
//! with its sources and dependency handles.

use serde::Serialize;

use crate::core::{Dependency, Executable, Outcome, Project};
use crate::ops::declarator::Evaluation;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Machine-readable JSON output
    Json,
}

/// Resolution status of one dependency, for reports.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyStatus {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,
    pub required: bool,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl From<&Dependency> for DependencyStatus {
    fn from(dep: &Dependency) -> Self {
        DependencyStatus {
            name: dep.name().to_string(),
            modules: dep.spec().modules().to_vec(),
            required: dep.spec().is_required(),
            found: dep.is_found(),
            version: dep
                .handle()
                .and_then(|h| h.version.as_ref())
                .map(|v| v.to_string()),
        }
    }
}

/// Everything the build collaborator needs from one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    /// Script the plan was produced from
    pub script: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,

    pub outcome: Outcome,

    /// Dependencies looked up before evaluation stopped
    pub dependencies: Vec<DependencyStatus>,

    /// Targets to build, in declaration order
    pub targets: Vec<Executable>,
}

impl BuildPlan {
    pub fn new(script: impl Into<String>, evaluation: &Evaluation) -> Self {
        BuildPlan {
            script: script.into(),
            project: evaluation.project().cloned(),
            outcome: evaluation.outcome().clone(),
            dependencies: evaluation
                .dependencies()
                .iter()
                .map(DependencyStatus::from)
                .collect(),
            targets: evaluation.targets().to_vec(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render the plan for terminal output.
    pub fn format_human(&self) -> String {
        let mut out = String::new();

        if let Some(project) = &self.project {
            let langs: Vec<&str> = project.languages().iter().map(|l| l.as_str()).collect();
            out.push_str(&format!("project: {} [{}]", project.name(), langs.join(", ")));
            if let Some(version) = project.version() {
                out.push_str(&format!(" v{}", version));
            }
            out.push('\n');
        }

        for dep in &self.dependencies {
            let mark = if dep.found { "found" } else { "not found" };
            let kind = if dep.required { "" } else { " (optional)" };
            let mut name = dep.name.clone();
            if !dep.modules.is_empty() {
                name = format!("{} ({})", name, dep.modules.join(", "));
            }
            match &dep.version {
                Some(v) => out.push_str(&format!("dependency {} {}: {}{}\n", name, v, mark, kind)),
                None => out.push_str(&format!("dependency {}: {}{}\n", name, mark, kind)),
            }
        }

        for target in &self.targets {
            let sources: Vec<String> = target
                .sources
                .iter()
                .map(|s| s.display().to_string())
                .collect();
            out.push_str(&format!("executable {}: {}", target.name, sources.join(" ")));
            let deps = target.dependency_names();
            if !deps.is_empty() {
                out.push_str(&format!(" -> {}", deps.join(", ")));
            }
            out.push('\n');
        }

        match &self.outcome {
            Outcome::Pass => out.push_str("result: pass\n"),
            Outcome::Skip(msg) => out.push_str(&format!("result: skip ({})\n", msg)),
            Outcome::Error(err) => out.push_str(&format!("result: error ({})\n", err)),
        }

        out
    }

    /// Render in the requested format.
    pub fn render(&self, format: OutputFormat) -> serde_json::Result<String> {
        match format {
            OutputFormat::Human => Ok(self.format_human()),
            OutputFormat::Json => self.to_json(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::evaluate::evaluate;
    use crate::resolver::StaticResolver;
    use crate::script::Script;
    use crate::test_support::fixtures;

    fn plan(resolver: &StaticResolver) -> BuildPlan {
        let script = Script::parse("declare.build", fixtures::LIBX_FIXTURE).unwrap();
        BuildPlan::new(script.name(), &evaluate(&script, resolver))
    }

    #[test]
    fn test_json_plan_for_passing_script() {
        let plan = plan(&fixtures::libx_installed(true, true));
        let json: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();

        assert_eq!(json["outcome"]["status"], "pass");
        assert_eq!(json["project"]["languages"][0], "cobol");
        assert_eq!(json["targets"][0]["name"], "App");
        assert_eq!(json["targets"][0]["sources"][0], "app.src");
        assert_eq!(json["targets"][0]["dependencies"][0]["name"], "libX");
        assert_eq!(json["targets"][0]["dependencies"][0]["version"], "1.4.0");
        assert_eq!(json["targets"][1]["name"], "Test");
        assert_eq!(json["dependencies"][1]["found"], true);
    }

    #[test]
    fn test_json_plan_for_skipped_script() {
        let plan = plan(&StaticResolver::new());
        let json: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();

        assert_eq!(json["outcome"]["status"], "skip");
        assert_eq!(json["outcome"]["message"], "Need libX dependency");
        assert_eq!(json["targets"].as_array().unwrap().len(), 0);
        assert_eq!(json["dependencies"][0]["found"], false);
        assert_eq!(json["dependencies"][0]["required"], false);
    }

    #[test]
    fn test_human_report() {
        let text = plan(&fixtures::libx_installed(true, false)).format_human();
        assert!(text.contains("project: libX dependency test [cobol]"));
        assert!(text.contains("dependency libX 1.4.0: found (optional)"));
        assert!(text.contains("dependency libXTest: not found (optional)"));
        assert!(text.ends_with("result: skip (Need libX dependency)\n"));
        assert!(!text.contains("executable"));
    }
}
