//! Page progress reporting with indicatif

use indicatif::{ProgressBar, ProgressStyle};
use slgprog_core::device::{Region, PAGE_COUNT, PAGE_SIZE};
use slgprog_core::protocol::{page_offset, OpKind};
use slgprog_core::session::PageProgress;
use std::fmt::Write as _;

fn create_progress_bar_style(phase: &str) -> Result<ProgressStyle, Box<dyn std::error::Error>> {
    Ok(ProgressStyle::default_bar()
        .template(&format!(
            "{phase} {{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} pages"
        ))?
        .progress_chars("#>-"))
}

/// Format one page as `XX:  YY YY ...`, labelled with its byte offset
pub fn format_page(page: u8, data: &[u8; PAGE_SIZE]) -> String {
    let mut line = format!("{:02X}: ", page_offset(page));
    for b in data {
        let _ = write!(line, " {:02X}", b);
    }
    line
}

/// Format the result line of one page erase
pub fn format_erased(page: u8) -> String {
    format!("Erasing {:02X}: Ok", page_offset(page))
}

/// Progress reporter using an indicatif progress bar
///
/// Page dumps and erase results are printed above the bar.
pub struct IndicatifProgress {
    current_bar: Option<ProgressBar>,
    /// Print each page as it is read or written
    dump: bool,
}

impl IndicatifProgress {
    pub fn new(dump: bool) -> Self {
        Self {
            current_bar: None,
            dump,
        }
    }

    fn create_bar(&mut self, phase: String) {
        let pb = ProgressBar::new(PAGE_COUNT as u64);
        pb.set_style(create_progress_bar_style(&phase).unwrap_or_else(|_| ProgressStyle::default_bar()));
        self.current_bar = Some(pb);
    }

    fn println(&self, line: String) {
        match &self.current_bar {
            Some(pb) => pb.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }

    fn advance(&self) {
        if let Some(pb) = &self.current_bar {
            pb.inc(1);
        }
    }
}

impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PageProgress for IndicatifProgress {
    fn starting(&mut self, op: OpKind, region: Region) {
        let phase = match op {
            OpKind::Read => "Reading",
            OpKind::Write => "Writing",
            OpKind::Erase => "Erasing",
        };
        self.create_bar(format!("{} {}", phase, region));
    }

    fn page_read(&mut self, page: u8, data: &[u8; PAGE_SIZE]) {
        if self.dump {
            self.println(format_page(page, data));
        }
        self.advance();
    }

    fn page_written(&mut self, page: u8, data: &[u8; PAGE_SIZE]) {
        if self.dump {
            self.println(format_page(page, data));
        }
        self.advance();
    }

    fn page_erased(&mut self, page: u8) {
        self.println(format_erased(page));
        self.advance();
    }

    fn complete(&mut self, op: OpKind) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
        log::info!("{} complete", op);
    }
}
