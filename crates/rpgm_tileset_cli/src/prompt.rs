//! Interactive answers to export questions

use rpgm_tileset_core::{Detection, LayoutKind};
use rpgm_tileset_export::Decisions;
use std::io::{BufRead, Write};
use std::path::Path;

/// Asks on a terminal, reading answers line by line
pub struct TerminalDecisions<R, W> {
    input: R,
    output: W,
    /// Layout given on the command line, used without asking when it fits
    layout: Option<LayoutKind>,
    /// Answer yes to every confirmation
    assume_yes: bool,
}

impl<R: BufRead, W: Write> TerminalDecisions<R, W> {
    pub fn new(input: R, output: W, layout: Option<LayoutKind>, assume_yes: bool) -> Self {
        Self {
            input,
            output,
            layout,
            assume_yes,
        }
    }

    /// Print a question and read one trimmed line; `None` on end of input
    fn ask(&mut self, question: &str) -> Option<String> {
        if write!(self.output, "{question} ").is_err() || self.output.flush().is_err() {
            return None;
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn confirm(&mut self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        loop {
            let Some(answer) = self.ask(&format!("{question} [y/N]")) else {
                return false;
            };
            match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" => return true,
                "" | "n" | "no" => return false,
                _ => {}
            }
        }
    }
}

impl<R: BufRead, W: Write> Decisions for TerminalDecisions<R, W> {
    fn requested_layout(&self) -> Option<LayoutKind> {
        self.layout
    }

    fn choose_layout(&mut self, candidates: &[LayoutKind]) -> Option<LayoutKind> {
        if let Some(kind) = self.layout.filter(|kind| candidates.contains(kind)) {
            return Some(kind);
        }

        let names: Vec<String> = candidates.iter().map(|kind| kind.to_string()).collect();
        let _ = writeln!(self.output, "This sheet could be any of: {}", names.join(", "));
        for kind in candidates {
            let _ = writeln!(self.output, "  {kind}: {}", kind.description());
        }
        loop {
            let answer = self.ask(&format!("Layout [{}]:", names.join("/")))?;
            if answer.is_empty() {
                return None;
            }
            match answer.parse::<LayoutKind>() {
                Ok(kind) if candidates.contains(&kind) => return Some(kind),
                _ => {
                    let _ = writeln!(self.output, "Please answer one of {}", names.join(", "));
                }
            }
        }
    }

    fn confirm_margin(&mut self, detection: &Detection) -> bool {
        let question = format!(
            "The sheet ({}x{} subtiles) seems to have margin or spacing, \
             which is not supported. Continue anyway?",
            detection.subtile_width, detection.subtile_height
        );
        self.confirm(&question)
    }

    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        self.confirm(&format!("{} already exists. Overwrite?", path.display()))
    }
}

/// Asks through native message dialogs
#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub struct DialogDecisions {
    pub layout: Option<LayoutKind>,
    pub assume_yes: bool,
}

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
impl DialogDecisions {
    fn ask(title: &str, description: &str) -> bool {
        use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(title)
            .set_description(description)
            .set_buttons(MessageButtons::YesNo)
            .show()
            == MessageDialogResult::Yes
    }
}

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
impl Decisions for DialogDecisions {
    fn requested_layout(&self) -> Option<LayoutKind> {
        self.layout
    }

    fn choose_layout(&mut self, candidates: &[LayoutKind]) -> Option<LayoutKind> {
        if let Some(kind) = self.layout.filter(|kind| candidates.contains(kind)) {
            return Some(kind);
        }
        // Dialogs only offer yes/no, so ask about each candidate in turn
        candidates.iter().copied().find(|kind| {
            Self::ask(
                "Choose layout",
                &format!("Is this an {kind} sheet ({})?", kind.description()),
            )
        })
    }

    fn confirm_margin(&mut self, detection: &Detection) -> bool {
        self.assume_yes
            || Self::ask(
                "Margin or spacing",
                &format!(
                    "The sheet ({}x{} subtiles) seems to have margin or spacing, \
                     which is not supported. Continue anyway?",
                    detection.subtile_width, detection.subtile_height
                ),
            )
    }

    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        self.assume_yes
            || Self::ask(
                "Overwrite file",
                &format!("{} already exists. Overwrite?", path.display()),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpgm_tileset_core::detect_layout;
    use std::io::Cursor;

    fn terminal(input: &str) -> TerminalDecisions<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalDecisions::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), None, false)
    }

    const AMBIGUOUS: [LayoutKind; 2] = [LayoutKind::A1, LayoutKind::A2];

    #[test]
    fn test_choose_layout_reprompts() {
        let mut decisions = terminal("A4\nwat\na2\n");
        assert_eq!(decisions.choose_layout(&AMBIGUOUS), Some(LayoutKind::A2));

        let output = String::from_utf8(decisions.output).unwrap();
        assert_eq!(output.matches("Please answer").count(), 2);
    }

    #[test]
    fn test_choose_layout_gives_up_on_empty_answer() {
        assert_eq!(terminal("\n").choose_layout(&AMBIGUOUS), None);
        assert_eq!(terminal("").choose_layout(&AMBIGUOUS), None);
    }

    #[test]
    fn test_preset_layout_skips_prompt() {
        let mut decisions = TerminalDecisions::new(
            Cursor::new(Vec::new()),
            Vec::new(),
            Some(LayoutKind::A1),
            false,
        );
        assert_eq!(decisions.choose_layout(&AMBIGUOUS), Some(LayoutKind::A1));
        assert!(decisions.output.is_empty());
    }

    #[test]
    fn test_confirmations() {
        let path = Path::new("out.tmj");
        assert!(terminal("y\n").confirm_overwrite(path));
        assert!(terminal("maybe\nYES\n").confirm_overwrite(path));
        assert!(!terminal("\n").confirm_overwrite(path));
        assert!(!terminal("").confirm_overwrite(path));

        let detection = detect_layout(32, 30, 10).unwrap();
        assert!(!terminal("n\n").confirm_margin(&detection));

        let mut yes = TerminalDecisions::new(Cursor::new(Vec::new()), Vec::new(), None, true);
        assert!(yes.confirm_margin(&detection));
        assert!(yes.confirm_overwrite(path));
    }
}
