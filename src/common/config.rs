use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::layout_engine::Insets;

/// What the resolver does when an attachment chain leads back to a control
/// that is still being resolved.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Anchor the re-entered side at the container origin and carry on.
    #[default]
    Tolerate,
    /// Fail the layout pass.
    Reject,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(deny_unknown_fields)]
pub struct FormLayoutSettings {
    /// Added to both the left and right margin.
    #[serde(default)]
    pub margin_width: i32,
    /// Added to both the top and bottom margin.
    #[serde(default)]
    pub margin_height: i32,
    #[serde(default)]
    pub margin_left: i32,
    #[serde(default)]
    pub margin_top: i32,
    #[serde(default)]
    pub margin_right: i32,
    #[serde(default)]
    pub margin_bottom: i32,
    /// Gap between a side and the adjacent side of the control it is attached to.
    #[serde(default)]
    pub spacing: i32,
    #[serde(default)]
    pub cycle_policy: CyclePolicy,
}

impl FormLayoutSettings {
    /// Space between the client area and the content area. `None` when a
    /// margin sum leaves the `i32` range.
    pub fn insets(&self) -> Option<Insets> {
        Some(Insets {
            top: self.margin_top.checked_add(self.margin_height)?,
            left: self.margin_left.checked_add(self.margin_width)?,
            bottom: self.margin_bottom.checked_add(self.margin_height)?,
            right: self.margin_right.checked_add(self.margin_width)?,
        })
    }

    fn margins_mut(&mut self) -> [(&'static str, &mut i32); 6] {
        [
            ("margin_width", &mut self.margin_width),
            ("margin_height", &mut self.margin_height),
            ("margin_left", &mut self.margin_left),
            ("margin_top", &mut self.margin_top),
            ("margin_right", &mut self.margin_right),
            ("margin_bottom", &mut self.margin_bottom),
        ]
    }

    pub fn validate(&self) -> Vec<String> {
        let mut copy = *self;
        copy.margins_mut()
            .into_iter()
            .filter(|(_, value)| **value < 0)
            .map(|(name, value)| format!("{name} must be non-negative, got {value}"))
            .collect()
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;
        for (_, value) in self.margins_mut() {
            if *value < 0 {
                *value = 0;
                fixes += 1;
            }
        }
        fixes
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directives, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self { Self { filter: default_log_filter() } }
}

fn default_log_filter() -> String { "warn".to_string() }

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub layout: FormLayoutSettings,
    #[serde(default)]
    pub log: LogSettings,
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&buf).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> { Ok(toml::from_str(buf)?) }

    pub fn builtin() -> Config {
        Self::parse(include_str!("../../formlayout.default.toml"))
            .expect("built-in default config must parse")
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;
        Ok(())
    }

    pub fn validate(&self) -> Vec<String> { self.layout.validate() }

    pub fn auto_fix_values(&mut self) -> usize { self.layout.auto_fix_values() }
}
