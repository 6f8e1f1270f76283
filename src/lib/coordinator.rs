//! Coordinator role: dispatch paragraphs to workers and reassemble results.
//!
//! The coordinator runs one dispatcher+collector pair per category, each on
//! its own thread over that category's link. A dispatcher re-parses the whole
//! input file, announcing and sending only its category's paragraphs while
//! counting every paragraph block it passes; because all four dispatchers
//! observe the same file, the file-wide count and the global indices they
//! derive are identical without any cross-thread coordination. The collector
//! half then receives transformed paragraphs and stores them into the shared
//! [`ResultBuffer`]. Once all pairs have joined, the buffer is serialized to
//! the output file in ascending global-index order.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};

use crate::buffer::{Paragraph, ResultBuffer};
use crate::category::Category;
use crate::fabric::Channel;
use crate::progress::ProgressTracker;
use crate::wire;

/// Dispatcher parser states over the lines of the input file.
enum ParserState {
    /// The next line opens a new paragraph block.
    WaitingForHeader,
    /// Inside another category's paragraph; ignore until a blank line.
    Skipping,
    /// Inside our category's paragraph; accumulate until a blank line.
    ReadingParagraph,
}

/// The coordinating role: owns the input/output paths and the result buffer.
pub struct Coordinator {
    input: PathBuf,
    output: PathBuf,
}

impl Coordinator {
    #[must_use]
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self { input: input.into(), output: output.into() }
    }

    /// Run the full dispatch/collect protocol over the given links and write
    /// the reassembled output file.
    ///
    /// Expects exactly one link per category. Returns the number of
    /// paragraphs written.
    pub fn run<C: Channel>(&self, links: Vec<(Category, C)>) -> Result<u64> {
        let buffer = Arc::new(ResultBuffer::new());

        thread::scope(|scope| -> Result<()> {
            let handles: Vec<_> = links
                .into_iter()
                .map(|(category, mut link)| {
                    let buffer = Arc::clone(&buffer);
                    let input = self.input.as_path();
                    scope.spawn(move || -> Result<()> {
                        dispatch(input, category, &mut link, &buffer)?;
                        collect(category, &mut link, &buffer)
                    })
                })
                .collect();

            let mut first_error = None;
            for handle in handles {
                let result = handle
                    .join()
                    .map_err(|_| anyhow!("dispatcher/collector thread panicked"))
                    .and_then(|r| r);
                if let Err(e) = result {
                    first_error.get_or_insert(e);
                }
            }
            match first_error {
                Some(e) => Err(e),
                None => Ok(()),
            }
        })?;

        let buffer = Arc::into_inner(buffer)
            .ok_or_else(|| anyhow!("result buffer still shared after all pairs joined"))?;
        self.write_output(buffer)
    }

    /// Serialize the buffer in increasing global-index order, mirroring the
    /// input layout: header label line, body lines, terminating blank line.
    fn write_output(&self, buffer: ResultBuffer) -> Result<u64> {
        let file = File::create(&self.output)
            .with_context(|| format!("Failed to create output file {}", self.output.display()))?;
        let mut writer = BufWriter::new(file);

        let mut written = 0u64;
        for (index, slot) in buffer.into_paragraphs().into_iter().enumerate() {
            let Some(paragraph) = slot else {
                // Stray blank lines in the input inflate the shared count and
                // leave holes; they carry no text, so they are skipped.
                warn!("No paragraph collected for index {index}; skipping");
                continue;
            };
            writeln!(writer, "{}", paragraph.category)?;
            if !paragraph.body.is_empty() {
                writer.write_all(paragraph.body.as_bytes())?;
                writeln!(writer)?;
            }
            writeln!(writer)?;
            written += 1;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write output file {}", self.output.display()))?;
        info!("Wrote {written} paragraphs to {}", self.output.display());
        Ok(written)
    }
}

/// Dispatcher half of a pair: scan the whole input, stream our category's
/// paragraphs, then size the shared buffer and send the end-of-stream
/// sentinel.
fn dispatch<C: Channel>(
    input: &Path,
    category: Category,
    link: &mut C,
    buffer: &ResultBuffer,
) -> Result<()> {
    let file = File::open(input)
        .with_context(|| format!("[{category}] failed to open input file {}", input.display()))?;
    let reader = BufReader::new(file);
    let tracker = ProgressTracker::new(format!("[{category}] dispatched paragraphs"));

    let mut state = ParserState::WaitingForHeader;
    // Becomes the 0-based global index of the current paragraph block.
    let mut index: i64 = -1;
    let mut body = String::new();

    for line in reader.lines() {
        let line = line
            .with_context(|| format!("[{category}] failed to read {}", input.display()))?;
        match state {
            ParserState::WaitingForHeader => {
                index += 1;
                if line == category.label() {
                    debug!("[{category}] announcing paragraph {index}");
                    wire::send_index(link, i32::try_from(index)?)?;
                    state = ParserState::ReadingParagraph;
                } else {
                    state = ParserState::Skipping;
                }
            }
            ParserState::Skipping => {
                if line.is_empty() {
                    state = ParserState::WaitingForHeader;
                }
            }
            ParserState::ReadingParagraph => {
                if line.is_empty() {
                    wire::send_body(link, &body)?;
                    body.clear();
                    tracker.log_if_needed(1);
                    state = ParserState::WaitingForHeader;
                } else {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(&line);
                }
            }
        }
    }

    if matches!(state, ParserState::ReadingParagraph) {
        // Missing trailing blank line. The worker was already told to expect
        // one body for the announced index, so flush rather than drop.
        warn!(
            "[{category}] input file {} does not end with a blank line; flushing final paragraph",
            input.display()
        );
        wire::send_body(link, &body)?;
        tracker.log_if_needed(1);
    }
    tracker.log_final();

    // Every dispatcher derives the same file-wide count; one allocation wins.
    let paragraph_count = usize::try_from(index + 1)?;
    if buffer.init_once(paragraph_count) {
        debug!("[{category}] sized the result buffer for {paragraph_count} paragraphs");
    }

    wire::send_index(link, wire::END_OF_STREAM)?;
    debug!("[{category}] dispatch complete");
    Ok(())
}

/// Collector half of a pair: receive transformed paragraphs until the
/// worker's sentinel and store them at their global indices.
fn collect<C: Channel>(category: Category, link: &mut C, buffer: &ResultBuffer) -> Result<()> {
    loop {
        let index = wire::recv_index(link)?;
        if index < 0 {
            debug!("[{category}] collection complete");
            return Ok(());
        }
        let body = wire::recv_body(link)?;
        buffer.store(Paragraph { index: usize::try_from(index)?, category, body })?;
    }
}
