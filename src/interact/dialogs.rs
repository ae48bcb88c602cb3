use std::io::{BufRead, Write};

use anyhow::Context as _;

use crate::foundation::error::MediaResult;
use crate::picture::color::Color;

/// Modal requests and notices. Every request returns `None` when the user cancels.
pub trait Dialogs {
    fn request_number(&mut self, message: &str) -> MediaResult<Option<f64>>;
    fn request_integer(&mut self, message: &str) -> MediaResult<Option<i64>>;
    /// Keeps asking until the answer lies in `min..=max`. Callers guarantee `min < max`.
    fn request_integer_in_range(
        &mut self,
        message: &str,
        min: i64,
        max: i64,
    ) -> MediaResult<Option<i64>>;
    fn request_string(&mut self, message: &str) -> MediaResult<Option<String>>;
    fn pick_color(&mut self, initial: Color) -> MediaResult<Option<Color>>;
    fn show_warning(&mut self, message: &str) -> MediaResult<()>;
    fn show_information(&mut self, message: &str) -> MediaResult<()>;
    fn show_error(&mut self, message: &str) -> MediaResult<()>;
}

/// Line-oriented dialogs over any reader/writer pair.
///
/// An empty line or end of input cancels a request. Unparseable answers are re-asked.
#[derive(Debug)]
pub struct TerminalDialogs<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalDialogs<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    pub(crate) fn say(&mut self, line: &str) -> MediaResult<()> {
        writeln!(self.output, "{line}").context("write dialog output")?;
        self.output.flush().context("flush dialog output")?;
        Ok(())
    }

    /// Print the prompt and read one trimmed line; `None` on cancel.
    pub(crate) fn ask(&mut self, title: &str, message: &str) -> MediaResult<Option<String>> {
        write!(self.output, "{title}: {message}\n> ").context("write dialog prompt")?;
        self.output.flush().context("flush dialog prompt")?;
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("read dialog answer")?;
        let answer = line.trim();
        if n == 0 || answer.is_empty() {
            return Ok(None);
        }
        Ok(Some(answer.to_string()))
    }

    fn ask_parsed<T>(
        &mut self,
        title: &str,
        message: &str,
        mut parse: impl FnMut(&str) -> Result<T, String>,
    ) -> MediaResult<Option<T>> {
        loop {
            let Some(answer) = self.ask(title, message)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Ok(v) => return Ok(Some(v)),
                Err(hint) => self.say(&hint)?,
            }
        }
    }
}

/// Terminal dialogs on the process stdin/stdout.
pub type StdioDialogs = TerminalDialogs<std::io::BufReader<std::io::Stdin>, std::io::Stdout>;

impl StdioDialogs {
    /// Several of these may coexist: stdin is never held locked, and the one-byte reader never
    /// pulls input past the end of the current line.
    pub fn stdio() -> Self {
        Self::new(
            std::io::BufReader::with_capacity(1, std::io::stdin()),
            std::io::stdout(),
        )
    }
}

fn parse_color(s: &str) -> Option<Color> {
    if let Some(hex) = s.strip_prefix('#') {
        let v = u32::from_str_radix(hex, 16).ok().filter(|_| hex.len() == 6)?;
        return Some(Color::new((v >> 16) as u8, (v >> 8) as u8, v as u8));
    }
    let parts: Vec<u8> = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(|p| p.parse().ok())
        .collect::<Option<_>>()?;
    match parts[..] {
        [r, g, b] => Some(Color::new(r, g, b)),
        _ => None,
    }
}

impl<R: BufRead, W: Write> Dialogs for TerminalDialogs<R, W> {
    fn request_number(&mut self, message: &str) -> MediaResult<Option<f64>> {
        self.ask_parsed("Enter a number", message, |s| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| "Please enter a number.".to_string())
        })
    }

    fn request_integer(&mut self, message: &str) -> MediaResult<Option<i64>> {
        self.ask_parsed("Enter an integer", message, |s| {
            s.parse::<i64>()
                .map_err(|_| "Please enter an integer.".to_string())
        })
    }

    fn request_integer_in_range(
        &mut self,
        message: &str,
        min: i64,
        max: i64,
    ) -> MediaResult<Option<i64>> {
        self.ask_parsed("Enter an integer in a range", message, |s| {
            s.parse::<i64>()
                .ok()
                .filter(|v| (min..=max).contains(v))
                .ok_or_else(|| format!("Please enter an integer between {min} and {max}."))
        })
    }

    fn request_string(&mut self, message: &str) -> MediaResult<Option<String>> {
        self.ask("Enter a string", message)
    }

    fn pick_color(&mut self, initial: Color) -> MediaResult<Option<Color>> {
        let prompt = format!(
            "red green blue, or #rrggbb (currently {} {} {})",
            initial.r, initial.g, initial.b
        );
        self.ask_parsed("Pick a color", &prompt, |s| {
            parse_color(s).ok_or_else(|| "Please enter three values from 0 to 255.".to_string())
        })
    }

    fn show_warning(&mut self, message: &str) -> MediaResult<()> {
        self.say(&format!("Warning: {message}"))
    }

    fn show_information(&mut self, message: &str) -> MediaResult<()> {
        self.say(&format!("Information: {message}"))
    }

    fn show_error(&mut self, message: &str) -> MediaResult<()> {
        self.say(&format!("Error: {message}"))
    }
}

#[cfg(feature = "native-dialogs")]
pub use native::NativeDialogs;

#[cfg(feature = "native-dialogs")]
mod native {
    use super::{Dialogs, StdioDialogs};
    use crate::foundation::error::MediaResult;
    use crate::picture::color::Color;

    /// Message boxes through the platform's native dialogs. `rfd` has no text entry or color
    /// chooser, so requests are asked on the terminal.
    pub struct NativeDialogs {
        prompt: StdioDialogs,
    }

    impl NativeDialogs {
        pub fn new() -> Self {
            Self {
                prompt: StdioDialogs::stdio(),
            }
        }

        fn notice(level: rfd::MessageLevel, title: &str, message: &str) {
            let _ = rfd::MessageDialog::new()
                .set_level(level)
                .set_title(title)
                .set_description(message)
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
        }
    }

    impl Default for NativeDialogs {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Dialogs for NativeDialogs {
        fn request_number(&mut self, message: &str) -> MediaResult<Option<f64>> {
            self.prompt.request_number(message)
        }

        fn request_integer(&mut self, message: &str) -> MediaResult<Option<i64>> {
            self.prompt.request_integer(message)
        }

        fn request_integer_in_range(
            &mut self,
            message: &str,
            min: i64,
            max: i64,
        ) -> MediaResult<Option<i64>> {
            self.prompt.request_integer_in_range(message, min, max)
        }

        fn request_string(&mut self, message: &str) -> MediaResult<Option<String>> {
            self.prompt.request_string(message)
        }

        fn pick_color(&mut self, initial: Color) -> MediaResult<Option<Color>> {
            self.prompt.pick_color(initial)
        }

        fn show_warning(&mut self, message: &str) -> MediaResult<()> {
            Self::notice(rfd::MessageLevel::Warning, "Warning", message);
            Ok(())
        }

        fn show_information(&mut self, message: &str) -> MediaResult<()> {
            Self::notice(rfd::MessageLevel::Info, "Information", message);
            Ok(())
        }

        fn show_error(&mut self, message: &str) -> MediaResult<()> {
            Self::notice(rfd::MessageLevel::Error, "Error", message);
            Ok(())
        }
    }
}

/// Dialogs used when the caller does not supply any.
pub fn default_dialogs() -> Box<dyn Dialogs> {
    #[cfg(feature = "native-dialogs")]
    {
        Box::new(NativeDialogs::new())
    }
    #[cfg(not(feature = "native-dialogs"))]
    {
        Box::new(StdioDialogs::stdio())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(input: &str) -> TerminalDialogs<&[u8], Vec<u8>> {
        TerminalDialogs::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn number_reasks_until_parseable() {
        let mut d = scripted("abc\n2.5\n");
        assert_eq!(d.request_number("How much?").unwrap(), Some(2.5));
        let (_, out) = d.into_parts();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Enter a number: How much?"));
        assert!(out.contains("Please enter a number."));
    }

    #[test]
    fn empty_line_and_eof_cancel() {
        assert_eq!(scripted("\n").request_integer("n").unwrap(), None);
        assert_eq!(scripted("").request_string("s").unwrap(), None);
    }

    #[test]
    fn integer_in_range_rejects_outside_values() {
        let mut d = scripted("11\n0\n7\n");
        assert_eq!(d.request_integer_in_range("pick", 1, 10).unwrap(), Some(7));
        let (_, out) = d.into_parts();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("between 1 and 10").count(), 2);
    }

    #[test]
    fn colors_parse_from_triples_and_hex() {
        assert_eq!(parse_color("255, 200 0"), Some(Color::ORANGE));
        assert_eq!(parse_color("#ffafaf"), Some(Color::PINK));
        assert_eq!(parse_color("1 2"), None);
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("300 0 0"), None);
    }

    #[test]
    fn notices_are_labelled() {
        let mut d = scripted("");
        d.show_warning("careful").unwrap();
        d.show_error("broken").unwrap();
        let (_, out) = d.into_parts();
        assert_eq!(String::from_utf8(out).unwrap(), "Warning: careful\nError: broken\n");
    }
}
