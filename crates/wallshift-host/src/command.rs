//! Setter-command backend
//!
//! Runs a user-configured shell command to set the wallpaper, so wallshift
//! works with any desktop that has a CLI setter (`feh`, `swaybg`,
//! `gsettings`, `hyprctl`, ...). The template may reference `{path}` and
//! `{target}`; a `Both` apply runs the command once per surface so setters
//! that only handle one surface per invocation still work.

use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

use wallshift_util::Target;

use crate::{HostError, HostResult, WallpaperBackend};

/// Backend that shells out to a configured setter command.
pub struct CommandBackend {
    template: String,
}

impl CommandBackend {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    fn run_for(&self, target: Target, path: &Path) -> HostResult<()> {
        let command = self
            .template
            .replace("{path}", &path.display().to_string())
            .replace("{target}", target.as_str());

        debug!(%command, "Running setter command");
        let status = Command::new("sh").arg("-c").arg(&command).status()?;

        if !status.success() {
            warn!(%command, %status, "Setter command failed");
            return Err(HostError::CommandFailed {
                command,
                status: status.to_string(),
            });
        }

        Ok(())
    }
}

impl WallpaperBackend for CommandBackend {
    fn apply(&self, target: Target, path: &Path) -> HostResult<()> {
        match target {
            Target::Both => {
                self.run_for(Target::Home, path)?;
                self.run_for(Target::Lock, path)
            }
            single => self.run_for(single, path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_substitutes_path_and_target() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let backend = CommandBackend::new(format!(
            "printf '%s %s' '{{target}}' '{{path}}' > {}",
            out.display()
        ));

        backend
            .apply(Target::Lock, Path::new("/pics/a.png"))
            .unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written, "lock /pics/a.png");
    }

    #[test]
    fn both_runs_once_per_surface() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let backend = CommandBackend::new(format!("printf '%s\\n' '{{target}}' >> {}", out.display()));

        backend
            .apply(Target::Both, Path::new("/pics/a.png"))
            .unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written, "home\nlock\n");
    }

    #[test]
    fn failing_command_is_an_error() {
        let backend = CommandBackend::new("exit 3");
        let err = backend
            .apply(Target::Home, Path::new("/pics/a.png"))
            .unwrap_err();
        assert!(matches!(err, HostError::CommandFailed { .. }));
    }
}
