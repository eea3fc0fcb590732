//! Final compression step.

/// Compresses preprocessed source. Runs after every other stage.
pub trait Minify: Send + Sync {
    fn minify(&self, source: &str) -> String;
}

/// Leaves the source as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Minify for Passthrough {
    fn minify(&self, source: &str) -> String {
        source.to_string()
    }
}

/// Conservative minifier that only touches line structure.
///
/// Strips trailing whitespace from every line, collapses runs of blank lines
/// into a single blank line, and trims the result. Content within a line is
/// never changed.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankLineMinifier;

impl Minify for BlankLineMinifier {
    fn minify(&self, source: &str) -> String {
        let mut out = String::with_capacity(source.len());
        let mut blank_run = false;

        for line in source.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                blank_run = true;
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
                if blank_run {
                    out.push('\n');
                }
            }
            blank_run = false;
            out.push_str(line);
        }

        out
    }
}

impl<F> Minify for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn minify(&self, source: &str) -> String {
        self(source)
    }
}
