use kedrogen::error::Result;
use kedrogen::prompt::{
    ConfirmationConfig, ConfirmationPrompter, SingleChoiceConfig, SingleChoicePrompter,
    StructuredDataConfig, StructuredDataPrompter, TextPromptConfig, TextPrompter,
};
use kedrogen::version::ToolVersion;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Prompter answering from queued replies, falling back to each prompt's default.
///
/// Every question asked is recorded so tests can assert which fields were prompted.
#[derive(Default)]
pub struct ScriptedPrompter {
    pub texts: RefCell<VecDeque<String>>,
    pub choices: RefCell<VecDeque<usize>>,
    pub confirmations: RefCell<VecDeque<bool>>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn with_choices(choices: &[usize]) -> Self {
        let prompter = Self::default();
        prompter.choices.borrow_mut().extend(choices.iter().copied());
        prompter
    }

    pub fn with_confirmations(confirmations: &[bool]) -> Self {
        let prompter = Self::default();
        prompter.confirmations.borrow_mut().extend(confirmations.iter().copied());
        prompter
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl TextPrompter for ScriptedPrompter {
    fn prompt_text(&self, config: &TextPromptConfig) -> Result<String> {
        self.asked.borrow_mut().push(config.prompt.clone());
        Ok(self
            .texts
            .borrow_mut()
            .pop_front()
            .or_else(|| config.default.clone())
            .unwrap_or_default())
    }
}

impl SingleChoicePrompter for ScriptedPrompter {
    fn prompt_single_choice(&self, config: &SingleChoiceConfig) -> Result<usize> {
        self.asked.borrow_mut().push(config.prompt.clone());
        Ok(self.choices.borrow_mut().pop_front().or(config.default_index).unwrap_or(0))
    }
}

impl ConfirmationPrompter for ScriptedPrompter {
    fn prompt_confirmation(&self, config: &ConfirmationConfig) -> Result<bool> {
        self.asked.borrow_mut().push(config.prompt.clone());
        let answer = self.confirmations.borrow_mut().pop_front().or(config.default);
        Ok(answer.unwrap_or_else(|| panic!("no scripted answer for '{}'", config.prompt)))
    }
}

impl StructuredDataPrompter for ScriptedPrompter {
    fn prompt_structured_data(&self, config: &StructuredDataConfig) -> Result<Value> {
        self.asked.borrow_mut().push(config.prompt.clone());
        Ok(config.default_value.clone())
    }
}

/// Writes `files` (relative path, content) below `root`.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

/// Creates an empty working directory called `name` below `parent`.
pub fn work_dir(parent: &Path, name: &str) -> PathBuf {
    let dir = parent.join(name);
    fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn tool_version() -> ToolVersion {
    ToolVersion::new("0.19.14")
}

pub const KEDRO_TEMPLATE: &str = "tests/templates/kedro-starter";
pub const FLAT_TEMPLATE: &str = "tests/templates/flat-starter";

/// Prints a diff of files and their contents between two directories.
/// Shows files only present in one directory and content differences for files present in both.
///
/// # Arguments
/// * `dir1` - The first directory to compare (actual output).
/// * `dir2` - The second directory to compare (expected output).
pub fn print_dir_diff(dir1: &Path, dir2: &Path) {
    let collect = |root: &Path| {
        WalkDir::new(root)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.path().is_file())
            .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
            .collect::<std::collections::BTreeSet<_>>()
    };
    let files1 = collect(dir1);
    let files2 = collect(dir2);

    println!("\n=== Directory Comparison ===");
    println!("Actual output:   {dir1:?}");
    println!("Expected output: {dir2:?}");

    for file in files1.difference(&files2) {
        println!("  + {file:?}");
    }
    for file in files2.difference(&files1) {
        println!("  - {file:?}");
    }
    for file in files1.intersection(&files2) {
        let content1 = fs::read(dir1.join(file)).unwrap();
        let content2 = fs::read(dir2.join(file)).unwrap();
        if content1 != content2 {
            println!("\n  File: {file:?}");
            println!("  --- Actual content:\n{}", String::from_utf8_lossy(&content1));
            println!("  --- Expected content:\n{}", String::from_utf8_lossy(&content2));
        }
    }
    println!("=== End of Comparison ===\n");
}

/// Asserts that two directory trees are byte-identical, printing a diff otherwise.
pub fn assert_same_tree(actual: &Path, expected: &Path) {
    if dir_diff::is_different(actual, expected).unwrap() {
        print_dir_diff(actual, expected);
        panic!("Directories differ. See above for details.");
    }
}
