use std::io::{self, Write};

use lyrics_core::{LyricsView, RunId, RunStatus};

/// Appends to a terminal what changed in the view since the last render.
#[derive(Debug, Default)]
pub struct Renderer {
    shown_run: Option<RunId>,
    shown_fragments: usize,
    shown_status: Option<RunStatus>,
}

impl Renderer {
    pub fn render(&mut self, view: &LyricsView, out: &mut impl Write) -> io::Result<()> {
        let Some(run) = view.run.as_ref() else {
            return Ok(());
        };

        if self.shown_run != Some(run.run_id) {
            writeln!(out, "\n== {} ==", run.query)?;
            self.shown_run = Some(run.run_id);
            self.shown_fragments = 0;
            self.shown_status = None;
        }

        for fragment in run.fragments.iter().skip(self.shown_fragments) {
            writeln!(out, "{fragment}")?;
        }
        self.shown_fragments = run.fragments.len();

        if self.shown_status != Some(run.status) {
            match run.status {
                RunStatus::Completed if run.fragments.is_empty() => {
                    writeln!(out, "(no lyrics found on the page)")?
                }
                _ => {}
            }
            self.shown_status = Some(run.status);
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::Renderer;
    use lyrics_core::{LyricsView, RunStatus, RunView};

    fn view(run_id: u64, query: &str, status: RunStatus, fragments: &[&str]) -> LyricsView {
        LyricsView {
            run: Some(RunView {
                run_id,
                query: query.to_string(),
                status,
                fragments: fragments.iter().map(|f| f.to_string()).collect(),
            }),
            ..LyricsView::default()
        }
    }

    fn render(renderer: &mut Renderer, view: &LyricsView) -> String {
        let mut out = Vec::new();
        renderer.render(view, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn only_new_fragments_are_printed() {
        let mut renderer = Renderer::default();
        let first = render(&mut renderer, &view(1, "imagine", RunStatus::Streaming, &["a"]));
        let second = render(
            &mut renderer,
            &view(1, "imagine", RunStatus::Streaming, &["a", "b"]),
        );
        assert_eq!(first, "\n== imagine ==\na\n");
        assert_eq!(second, "b\n");
    }

    #[test]
    fn new_run_prints_header_again() {
        let mut renderer = Renderer::default();
        render(&mut renderer, &view(1, "imagine", RunStatus::Streaming, &["a"]));
        let out = render(&mut renderer, &view(2, "yesterday", RunStatus::Searching, &[]));
        assert_eq!(out, "\n== yesterday ==\n");
    }

    #[test]
    fn empty_view_prints_nothing() {
        let mut renderer = Renderer::default();
        assert_eq!(render(&mut renderer, &LyricsView::default()), "");
    }
}
