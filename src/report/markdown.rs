use crate::burndown::Granularity;
use crate::model::{Error, Result, Snapshot};
use crate::utils::write_atomic;
use log::info;
use markdown_builder::Markdown;
use markdown_table::{Heading, HeadingAlignment, MarkdownTable};
use std::path::Path;

pub trait MarkdownReport {
    fn report_render(&self, title: &str, granularity: Granularity) -> Result<String>;
    fn report_create(&self, path: &Path, title: &str, granularity: Granularity) -> Result<()>;
}

impl MarkdownReport for [Snapshot] {
    fn report_render(&self, title: &str, granularity: Granularity) -> Result<String> {
        let mut doc = Markdown::new();

        doc.header1(format!("Burndown: {}", title));
        let (Some(first), Some(last)) = (self.first(), self.last()) else {
            doc.paragraph("No snapshots in the selected range.".to_string());
            return Ok(doc.render());
        };
        doc.header2(format!(
            "{} ({} - {})",
            match granularity {
                Granularity::Daily => "Daily",
                Granularity::Weekly => "Weekly",
            },
            first.ds.format("%d.%m.%Y"),
            last.ds.format("%d.%m.%Y"),
        ));
        doc.add_summary(self);
        doc.add_snapshot_table(self)?;
        Ok(doc.render())
    }

    fn report_create(&self, path: &Path, title: &str, granularity: Granularity) -> Result<()> {
        let report = self.report_render(title, granularity)?;
        write_atomic(path, report.as_bytes())?;
        info!("Markdown report saved to {}", path.display());
        Ok(())
    }
}

trait MarkdownExt {
    fn add_summary(&mut self, snapshots: &[Snapshot]);
    fn add_snapshot_table(&mut self, snapshots: &[Snapshot]) -> Result<()>;
}

impl MarkdownExt for Markdown {
    fn add_summary(&mut self, snapshots: &[Snapshot]) {
        let first = snapshots.first().map(|s| s.remaining).unwrap_or_default();
        let last = snapshots.last().map(|s| s.remaining).unwrap_or_default();
        let peak = snapshots.iter().map(|s| s.remaining).max().unwrap_or_default();
        self.paragraph(format!(
            "**{}** remaining (started at *{}*, peak *{}*, burned *{}*)",
            last,
            first,
            peak,
            first - last
        ));
    }

    fn add_snapshot_table(&mut self, snapshots: &[Snapshot]) -> Result<()> {
        let header = vec![
            Heading::new("Date".to_string(), Some(HeadingAlignment::Center)),
            Heading::new("Remaining".to_string(), Some(HeadingAlignment::Center)),
        ];
        let table = snapshots
            .iter()
            .map(|s| vec![s.ds.format("%Y-%m-%d").to_string(), format!("{}", s.remaining)])
            .collect::<Vec<_>>();

        let mut md_table = MarkdownTable::new(table);
        md_table.with_headings(header);
        let rendered = md_table
            .as_markdown()
            .map_err(|err| Error::Render(format!("{:?}", err)))?;
        self.paragraph(rendered);
        Ok(())
    }
}
