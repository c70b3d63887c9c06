//! Test doubles: scripted confirmation and a plain-text tag format.

use album_tidy_core::{AudioFormat, Confirm, Error, Field, MetadataSource, Result, TagReader};
use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

/// Answers prompts from a fixed script, then with `fallback`
pub struct Scripted {
    answers: VecDeque<bool>,
    fallback: bool,
    pub prompts: Vec<String>,
}

impl Scripted {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            fallback: false,
            prompts: Vec::new(),
        }
    }

    pub fn always() -> Self {
        Self {
            fallback: true,
            ..Self::new(&[])
        }
    }

    pub fn never() -> Self {
        Self::new(&[])
    }

    pub fn asked(&self) -> usize {
        self.prompts.len()
    }
}

impl Confirm for Scripted {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().unwrap_or(self.fallback)
    }
}

fn key(field: Field) -> &'static str {
    match field {
        Field::Artist => "artist",
        Field::Album => "album",
        Field::Title => "title",
        Field::Track => "track",
        Field::Disc => "disc",
    }
}

/// "Audio" files whose content is `key=value` lines
pub struct TextTags {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl MetadataSource for TextTags {
    fn get(&self, field: Field) -> Option<String> {
        self.values.get(key(field)).cloned()
    }

    fn set(&mut self, field: Field, value: &str) {
        self.values.insert(key(field).to_string(), value.to_string());
    }

    fn save(&mut self) -> Result<()> {
        fs::write(&self.path, render(&self.values))?;
        Ok(())
    }
}

pub struct TextTagReader;

impl TagReader for TextTagReader {
    fn open(&self, path: &Path, _format: AudioFormat) -> Result<Box<dyn MetadataSource>> {
        let content = fs::read_to_string(path)?;
        let mut values = BTreeMap::new();
        for line in content.lines() {
            let (k, v) = line.split_once('=').ok_or_else(|| Error::Tag {
                path: path.to_path_buf(),
                message: format!("bad line '{}'", line),
            })?;
            values.insert(k.to_string(), v.to_string());
        }
        Ok(Box::new(TextTags {
            path: path.to_path_buf(),
            values,
        }))
    }
}

fn render(values: &BTreeMap<String, String>) -> String {
    values
        .iter()
        .map(|(k, v)| format!("{}={}\n", k, v))
        .collect()
}

/// Write a fake audio file with the given tags
pub fn write_track(path: &Path, tags: &[(Field, &str)]) {
    let values: BTreeMap<String, String> = tags
        .iter()
        .map(|(f, v)| (key(*f).to_string(), v.to_string()))
        .collect();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, render(&values)).unwrap();
}

/// Read back one tag of a fake audio file
pub fn read_tag(path: &Path, field: Field) -> Option<String> {
    TextTagReader
        .open(path, AudioFormat::Mp3)
        .unwrap()
        .get(field)
}

/// Sorted file names directly inside `dir`
pub fn names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
