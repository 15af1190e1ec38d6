//! Ordered check lists.
//!
//! A [`Battery`] is the fixed list of checks one run executes, grouped into
//! titled sections for the report. Grouping has no effect on evaluation or
//! counting.

use crate::harness::TestCase;

/// A titled group of checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub cases: Vec<TestCase>,
}

impl Section {
    pub fn new(title: impl Into<String>, cases: Vec<TestCase>) -> Self {
        Self {
            title: title.into(),
            cases,
        }
    }
}

/// The full, ordered list of checks for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battery {
    pub title: String,
    pub sections: Vec<Section>,
    /// Lines printed under the success banner when every check passes.
    pub success_notes: Vec<String>,
}

impl Battery {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
            success_notes: Vec::new(),
        }
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn success_note(mut self, line: impl Into<String>) -> Self {
        self.success_notes.push(line.into());
        self
    }

    /// All checks in execution order.
    pub fn cases(&self) -> impl Iterator<Item = &TestCase> {
        self.sections.iter().flat_map(|s| s.cases.iter())
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.cases.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn exists_check(name: &str, flag: char, path: &str) -> TestCase {
    TestCase::new(name, format!("test -{flag} {path} && echo 'ok'"), "ok")
}

/// The project's own layout checks: the layer detector must report the
/// application layer as active, and the three layer folders and one key file
/// in each must exist.
pub fn default_battery() -> Battery {
    Battery::new("LA Snake - Automated Test Suite")
        .section(Section::new(
            "LAYER DETECTION",
            vec![TestCase::new(
                "Test 1: Detect 3 layers (application, interface, infrastructure)",
                "python3 tools/detect-active-layers.py",
                r#""application": true"#,
            )],
        ))
        .section(Section::new(
            "FILE STRUCTURE",
            vec![
                exists_check("Test 2: application/ folder exists", 'd', "application"),
                exists_check("Test 3: interface/ folder exists", 'd', "interface"),
                exists_check("Test 4: infrastructure/ folder exists", 'd', "infrastructure"),
            ],
        ))
        .section(Section::new(
            "KEY FILES",
            vec![
                exists_check("Test 5: index.html exists", 'f', "interface/index.html"),
                exists_check("Test 6: game-loop.js exists", 'f', "application/game-loop.js"),
                exists_check("Test 7: canvas.js exists", 'f', "infrastructure/canvas.js"),
            ],
        ))
        .success_note("LA Snake is ready to push to GitHub:")
        .success_note("  git add .")
        .success_note("  git commit -m '[C3] LA Snake v2: LA v1.1 minimal demo'")
        .success_note("  git push origin main")
}
