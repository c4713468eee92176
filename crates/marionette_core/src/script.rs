//! Script loading, name substitution and validation.

use crate::{Actor, Cast, Line};
use marionette_error::{ScriptError, ScriptErrorKind, ScriptResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Roster key reserved for the narrating app identity.
pub const APP_KEY: &str = "app";

/// Authoring problems found by [`Script::validate`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ScriptWarning {
    /// A line names an actor that is not declared.
    #[display("line {}: actor '{}' is not declared", line, actor)]
    UnknownActor {
        /// Line index
        line: usize,
        /// Actor key
        actor: String,
    },
    /// A line names a space that is not mapped.
    #[display("line {}: space '{}' is not mapped", line, space)]
    UnknownSpace {
        /// Line index
        line: usize,
        /// Space key
        space: String,
    },
    /// A line has neither text nor filename.
    #[display("line {}: neither text nor filename", _0)]
    EmptyLine(usize),
}

/// A loaded, immutable playback script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Script {
    /// Narrating app identity
    #[serde(default)]
    app: Actor,
    /// Scripted actors, in declaration order
    #[serde(default)]
    actors: Cast,
    /// Space key to platform space id
    #[serde(default)]
    spaces: HashMap<String, String>,
    /// Ordered lines
    #[serde(default)]
    lines: Vec<Line>,
    /// Directory assets are resolved against
    #[serde(skip)]
    root: PathBuf,
}

impl Script {
    /// Assemble a script from parts and apply name substitution.
    pub fn new(
        app: Actor,
        actors: Cast,
        spaces: HashMap<String, String>,
        lines: Vec<Line>,
        root: impl Into<PathBuf>,
    ) -> Self {
        let mut script = Self {
            app,
            actors,
            spaces,
            lines,
            root: root.into(),
        };
        script.substitute_names();
        script
    }

    /// Load `script.json`, or failing that `script.toml`, from a directory.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Neither script file exists
    /// - The file cannot be read
    /// - The file does not parse
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn from_dir(dir: impl AsRef<Path>) -> ScriptResult<Self> {
        let dir = dir.as_ref();
        let json = dir.join("script.json");
        let toml = dir.join("script.toml");

        let mut script = if json.is_file() {
            debug!(path = %json.display(), "Loading JSON script");
            Self::from_json_str(&read(&json)?)?
        } else if toml.is_file() {
            debug!(path = %toml.display(), "Loading TOML script");
            Self::from_toml_str(&read(&toml)?)?
        } else {
            return Err(ScriptError::new(ScriptErrorKind::MissingScript(
                dir.to_path_buf(),
            )));
        };
        script.root = dir.to_path_buf();

        for warning in script.validate() {
            warn!(%warning, "Script problem");
        }
        info!(
            actors = script.actors.len(),
            lines = script.lines.len(),
            "Script loaded"
        );
        Ok(script)
    }

    /// Parse a JSON script. Assets resolve against the current directory.
    pub fn from_json_str(source: &str) -> ScriptResult<Self> {
        let mut script: Self = serde_json::from_str(source)
            .map_err(|e| ScriptError::new(ScriptErrorKind::Json(e.to_string())))?;
        script.substitute_names();
        Ok(script)
    }

    /// Parse a TOML script. Assets resolve against the current directory.
    pub fn from_toml_str(source: &str) -> ScriptResult<Self> {
        let mut script: Self = toml::from_str(source)
            .map_err(|e| ScriptError::new(ScriptErrorKind::Toml(e.to_string())))?;
        script.substitute_names();
        Ok(script)
    }

    /// Replace `{{key}}` in every line's text with that actor's display name.
    ///
    /// Runs once at load. Tokens for actors without a name stay as written.
    fn substitute_names(&mut self) {
        let names: Vec<(String, String)> = self
            .actors
            .iter()
            .filter_map(|(key, actor)| {
                actor
                    .name()
                    .as_ref()
                    .map(|name| (format!("{{{{{}}}}}", key), name.clone()))
            })
            .collect();

        for line in &mut self.lines {
            if let Some(text) = line.text_mut() {
                for (token, name) in &names {
                    text.replace_all(token, name);
                }
            }
        }
    }

    /// Authoring problems that will surface as dispatch errors during playback.
    pub fn validate(&self) -> Vec<ScriptWarning> {
        let mut warnings = Vec::new();
        for (index, line) in self.lines.iter().enumerate() {
            if let Some(actor) = line.actor()
                && !self.actors.contains(actor)
            {
                warnings.push(ScriptWarning::UnknownActor {
                    line: index,
                    actor: actor.clone(),
                });
            }
            if let Some(space) = line.space()
                && !self.spaces.contains_key(space)
                && !*line.comment()
            {
                warnings.push(ScriptWarning::UnknownSpace {
                    line: index,
                    space: space.clone(),
                });
            }
            if line.payload().is_none() {
                warnings.push(ScriptWarning::EmptyLine(index));
            }
        }
        warnings
    }

    /// Narrating app identity.
    pub fn app(&self) -> &Actor {
        &self.app
    }

    /// Scripted actors in declaration order.
    pub fn actors(&self) -> &Cast {
        &self.actors
    }

    /// Space key to platform id mapping.
    pub fn spaces(&self) -> &HashMap<String, String> {
        &self.spaces
    }

    /// Lines in playback order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Line at the given cursor.
    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the script has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Directory assets resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an asset name against the script directory.
    pub fn asset_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Display name of whoever speaks a line.
    pub fn speaker_name<'a>(&'a self, line: &'a Line) -> &'a str {
        match line.actor() {
            Some(key) => self
                .actors
                .get(key)
                .map(|actor| actor.display_name(key))
                .unwrap_or(key),
            None => self.app.display_name("App"),
        }
    }

    /// Plain-text transcript of the spoken lines.
    ///
    /// Comments print as `[text]`, everything else as `ACTOR: text`.
    pub fn transcript(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter_map(|line| {
                let text = line.joined_text()?;
                if *line.comment() {
                    return Some(format!("[{}]", text));
                }
                let speaker = match line.actor() {
                    Some(_) => self.speaker_name(line).to_uppercase(),
                    None => String::new(),
                };
                Some(format!("{}: {}", speaker, text))
            })
            .collect()
    }
}

fn read(path: &Path) -> ScriptResult<String> {
    fs::read_to_string(path).map_err(|e| {
        ScriptError::new(ScriptErrorKind::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    })
}
