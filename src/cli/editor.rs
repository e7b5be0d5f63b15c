//! Dictation through an external text editor.
//!
//! The content is written to an owner-only temp file in the per-process
//! scratch directory, the editor is launched on it, and the saved file is
//! parsed back into a briefcase.  The temp file is wiped and removed on
//! every path out of `take_dictation`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::process::Command;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{MrsError, Result};
use crate::fs::ScratchDir;
use crate::secret::{Briefcase, Dictation, EDITOR_INSTRUCTIONS};

pub struct EditorDictation<'a> {
    editor: &'a str,
    scratch: &'a ScratchDir,
    show_instructions: bool,
}

impl<'a> EditorDictation<'a> {
    pub fn new(settings: &'a Settings, scratch: &'a ScratchDir) -> Self {
        Self {
            editor: &settings.editor,
            scratch,
            show_instructions: !settings.hide_editor_instructions,
        }
    }
}

impl Dictation for EditorDictation<'_> {
    fn take_dictation(&self, content: &str) -> Result<Briefcase> {
        let content = if self.show_instructions {
            Zeroizing::new(format!("{EDITOR_INSTRUCTIONS}{content}"))
        } else {
            Zeroizing::new(content.to_string())
        };

        let file = self.scratch.write_temp_file(&content)?;
        launch(self.editor, file.path())?;

        let reader = BufReader::new(File::open(file.path())?);
        Briefcase::from_reader(reader)
    }
}

/// Run `editor` on `path` attached to the terminal and wait for it.
///
/// The editor string may carry arguments (`code --wait`).
fn launch(editor: &str, path: &Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| MrsError::EditorError("no editor configured".into()))?;

    let mut command = Command::new(program);
    command.args(parts).arg(path);
    if let Some(dir) = path.parent() {
        command.current_dir(dir);
    }

    tracing::debug!(editor = %editor, "launching editor");
    let status = command
        .status()
        .map_err(|e| MrsError::EditorError(format!("failed to launch '{editor}': {e}")))?;

    if !status.success() {
        return Err(MrsError::EditorError(format!(
            "editor exited with code {}",
            status.code().unwrap_or(-1)
        )));
    }
    Ok(())
}
