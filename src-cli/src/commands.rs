//! Command implementations

use anyhow::{bail, Context};
use edit_engine::{search_titles, AnyThread, Document, Format, RowInput, Spreadsheet, Thread};
use indexmap::IndexMap;
use remote_client::RemoteClient;
use sheet_model::CellValue;
use std::path::Path;
use std::sync::Arc;

/// Parse a `Header=value` cell argument
pub fn parse_field(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected Header=value, got {:?}", arg)),
    }
}

/// Row input from positional values or `Header=value` fields
pub fn row_input(values: Vec<String>, fields: Vec<(String, String)>) -> anyhow::Result<RowInput> {
    if !fields.is_empty() {
        if !values.is_empty() {
            bail!("give either positional values or --field cells, not both");
        }
        let mapping: IndexMap<String, CellValue> = fields
            .into_iter()
            .map(|(key, value)| (key, CellValue::from(value)))
            .collect();
        return Ok(RowInput::Mapping(mapping));
    }
    if values.is_empty() {
        bail!("no cells given");
    }
    Ok(RowInput::Values(values.into_iter().map(CellValue::from).collect()))
}

fn spreadsheet(client: Arc<RemoteClient>, thread_id: &str) -> anyhow::Result<Spreadsheet> {
    Ok(AnyThread::open(client, thread_id)?.into_spreadsheet()?)
}

fn document(client: Arc<RemoteClient>, thread_id: &str) -> anyhow::Result<Document> {
    Ok(AnyThread::open(client, thread_id)?.into_document()?)
}

fn print_identity(thread: &Thread) {
    println!("{} ({})", thread.title(), thread.kind().as_str());
    println!("  id:      {}", thread.id());
    println!("  link:    {}", thread.link());
    if let Some(created) = thread.created_at() {
        println!("  created: {}", created.to_rfc3339());
    }
    if let Some(updated) = thread.updated_at() {
        println!("  updated: {}", updated.to_rfc3339());
    }
}

pub fn show(client: Arc<RemoteClient>, thread_id: &str) -> anyhow::Result<()> {
    let thread = AnyThread::open(client, thread_id)?;
    print_identity(thread.thread());
    if thread.thread().is_corrupted() {
        println!("  content could not be read");
        return Ok(());
    }
    match &thread {
        AnyThread::Document(document) => {
            for heading in document.headings()? {
                let indent = "  ".repeat(heading.level.max(1) as usize);
                println!("{}{}", indent, heading.text);
            }
        }
        AnyThread::Spreadsheet(spreadsheet) => {
            for name in spreadsheet.sheet_names()? {
                println!("  sheet: {}", name);
            }
        }
        AnyThread::Generic(_) => {}
    }
    Ok(())
}

pub fn lists(client: Arc<RemoteClient>, thread_id: &str) -> anyhow::Result<()> {
    let document = document(client, thread_id)?;
    for list in document.lists()? {
        let items = document.list_items(list.as_str())?;
        println!("{} ({} items)", list, items.len());
        for (i, item) in items.iter().enumerate() {
            match item {
                Some(anchor) => println!("  {}: {}", i, anchor),
                None => println!("  {}: (no anchor)", i),
            }
        }
    }
    Ok(())
}

pub fn sheets(client: Arc<RemoteClient>, thread_id: &str) -> anyhow::Result<()> {
    let spreadsheet = spreadsheet(client, thread_id)?;
    for (name, sheet) in spreadsheet.sheets()? {
        println!("{}: {}", name, sheet.column_headers().join(", "));
    }
    Ok(())
}

pub fn export(
    client: Arc<RemoteClient>,
    thread_id: &str,
    sheet: Option<&str>,
    dir: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let spreadsheet = spreadsheet(client, thread_id)?;
    if json {
        println!("{}", spreadsheet.export_json(sheet)?);
    } else {
        let path = spreadsheet
            .export_xlsx(sheet, dir)
            .with_context(|| format!("exporting {} to {}", thread_id, dir.display()))?;
        println!("{}", path.display());
    }
    Ok(())
}

pub fn append_row(
    client: Arc<RemoteClient>,
    thread_id: &str,
    sheet: Option<&str>,
    values: Vec<String>,
    fields: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let row = row_input(values, fields)?;
    let mut spreadsheet = spreadsheet(client, thread_id)?;
    spreadsheet.append_row(sheet, row)?;
    println!("Row added to {}", spreadsheet.thread().title());
    Ok(())
}

pub fn update_cell(
    client: Arc<RemoteClient>,
    thread_id: &str,
    sheet: Option<&str>,
    reference: &str,
    value: String,
) -> anyhow::Result<()> {
    let mut spreadsheet = spreadsheet(client, thread_id)?;
    spreadsheet.update_cell(sheet, reference, value)?;
    println!("Updated {}", reference);
    Ok(())
}

pub fn append(client: Arc<RemoteClient>, thread_id: &str, content: &str, format: Format) -> anyhow::Result<()> {
    let mut document = document(client, thread_id)?;
    document.add_to_end(content, format)?;
    println!("Appended to {}", document.thread().title());
    Ok(())
}

pub fn search(client: &RemoteClient, query: &str, search_content: bool, count: Option<u32>) -> anyhow::Result<()> {
    for (title, id) in search_titles(client, query, search_content, count)? {
        println!("{}\t{}", id, title);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("Billed=6/24/2015").unwrap(),
            ("Billed".to_string(), "6/24/2015".to_string())
        );
        assert_eq!(parse_field("Note=a=b").unwrap().1, "a=b");
        assert!(parse_field("Billed").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn test_row_input() {
        let values = row_input(vec!["a".into(), "b".into()], Vec::new()).unwrap();
        assert_eq!(
            values,
            RowInput::Values(vec![CellValue::from("a"), CellValue::from("b")])
        );

        let fields = row_input(Vec::new(), vec![("Date".into(), "5/1".into())]).unwrap();
        match fields {
            RowInput::Mapping(mapping) => assert_eq!(mapping["Date"], CellValue::from("5/1")),
            other => panic!("unexpected row {other:?}"),
        }

        assert!(row_input(Vec::new(), Vec::new()).is_err());
        assert!(row_input(vec!["a".into()], vec![("Date".into(), "x".into())]).is_err());
    }

    #[test]
    fn test_cli_parses_append_row() {
        let cli = Cli::try_parse_from([
            "quipdoc-cli",
            "append-row",
            "T1",
            "--sheet",
            "Accounts",
            "--field",
            "Customer=Acme",
            "--field",
            "Billed=6/24/2015",
            "--insecure",
        ])
        .unwrap();
        assert!(cli.insecure);
        match cli.command {
            Commands::AppendRow {
                thread_id,
                sheet,
                fields,
                values,
            } => {
                assert_eq!(thread_id, "T1");
                assert_eq!(sheet.as_deref(), Some("Accounts"));
                assert_eq!(fields.len(), 2);
                assert!(values.is_empty());
            }
            _ => panic!("expected append-row"),
        }
    }

    #[test]
    fn test_cli_parses_update_cell() {
        let cli = Cli::try_parse_from(["quipdoc-cli", "update-cell", "T1", "Billed:3", "7/1/2015"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::UpdateCell { ref reference, .. } if reference == "Billed:3"
        ));
    }
}
