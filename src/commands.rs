use crate::config::{Command, CreateArgs, ListArgs};
use anyhow::{Context, Result};
use log::info;
use rp_log_client::{
    Attach, CreateLogItemRequest, FilterOption, LogItemResource, LogLevel, SortDirection,
};
use serde::Serialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 20;

pub async fn execute_command(cmd: Command, logs: &LogItemResource) -> Result<()> {
    match cmd {
        Command::List(args) => {
            let filter = build_filter(&args)?;
            let page = logs
                .list(Some(&filter))
                .await
                .context("Failed to list log items")?;
            info!(
                "Fetched {} of {} log items",
                page.content.len(),
                page.page.total_elements
            );
            print_json(&page)?;
        }

        Command::Get { id } => {
            let item = logs
                .get_by_id(id)
                .await
                .with_context(|| format!("Failed to fetch log item {}", id))?;
            print_json(&item)?;
        }

        Command::GetUuid { uuid } => {
            let item = logs
                .get_by_uuid(&uuid)
                .await
                .with_context(|| format!("Failed to fetch log item {}", uuid))?;
            print_json(&item)?;
        }

        Command::Attachment { id, output } => {
            let data = logs
                .get_binary_data(&id)
                .await
                .with_context(|| format!("Failed to download attachment {}", id))?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, &data)
                        .await
                        .with_context(|| format!("Failed to write attachment to {:?}", path))?;
                    info!("Saved {} bytes to {:?}", data.len(), path);
                }
                None => {
                    let mut stdout = tokio::io::stdout();
                    stdout.write_all(&data).await?;
                    stdout.flush().await?;
                }
            }
        }

        Command::Create(args) => {
            let request = build_create_request(args).await?;
            let created = logs
                .create(&request)
                .await
                .context("Failed to create log item")?;
            info!("Created log item {}", created.id);
            print_json(&created)?;
        }

        Command::Delete { id } => {
            let message = logs
                .delete(id)
                .await
                .with_context(|| format!("Failed to delete log item {}", id))?;
            print_json(&message)?;
        }
    }

    Ok(())
}

fn build_filter(args: &ListArgs) -> Result<FilterOption> {
    let mut filter = FilterOption::new();

    if args.page.is_some() || args.size.is_some() {
        filter = filter.page(
            args.page.unwrap_or(DEFAULT_PAGE),
            args.size.unwrap_or(DEFAULT_PAGE_SIZE),
        );
    }

    for raw in &args.filters {
        let (field, value) = raw
            .split_once('=')
            .with_context(|| format!("Filter must be field=value, got: {}", raw))?;
        filter = filter.equals(field, value);
    }

    if let Some(ref sort) = args.sort {
        let direction = if args.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        filter = filter.sort_by(&[sort.as_str()], direction);
    }

    Ok(filter)
}

async fn build_create_request(args: CreateArgs) -> Result<CreateLogItemRequest> {
    let level: LogLevel = args.level.parse().map_err(anyhow::Error::msg)?;

    let mut request = CreateLogItemRequest::new(args.launch_uuid, args.message, level);

    if let Some(item_uuid) = args.item_uuid {
        request = request.with_item(item_uuid);
    }

    if let Some(path) = args.attach {
        let data = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read attachment: {:?}", path))?;
        let name = file_name(&path)?;
        request = request.with_attach(Attach::new(name, args.mime, data));
    }

    Ok(request)
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Attachment path has no file name: {:?}", path))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to render response")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_args(filters: &[&str]) -> ListArgs {
        ListArgs {
            page: Some(1),
            size: Some(10),
            filters: filters.iter().map(|f| f.to_string()).collect(),
            sort: Some("logTime".to_string()),
            desc: true,
        }
    }

    #[test]
    fn test_build_filter_from_args() {
        let filter = build_filter(&list_args(&["item=42"])).unwrap();

        assert_eq!(
            filter.to_string(),
            "page.page=1&page.size=10&filter.eq.item=42&page.sort=logTime,DESC"
        );
    }

    #[test]
    fn test_build_filter_size_alone_enables_paging() {
        let args = ListArgs {
            page: None,
            size: Some(50),
            filters: Vec::new(),
            sort: None,
            desc: false,
        };

        assert_eq!(build_filter(&args).unwrap().to_string(), "page.page=1&page.size=50");
    }

    #[test]
    fn test_build_filter_page_alone_uses_default_size() {
        let args = ListArgs {
            page: Some(3),
            size: None,
            filters: Vec::new(),
            sort: None,
            desc: false,
        };

        assert_eq!(build_filter(&args).unwrap().to_string(), "page.page=3&page.size=20");
    }

    #[test]
    fn test_build_filter_without_paging_flags() {
        let args = ListArgs {
            page: None,
            size: None,
            filters: Vec::new(),
            sort: None,
            desc: false,
        };

        assert!(build_filter(&args).unwrap().is_empty());
    }

    #[test]
    fn test_build_filter_rejects_malformed_condition() {
        assert!(build_filter(&list_args(&["level"])).is_err());
    }

    #[tokio::test]
    async fn test_build_create_request_reads_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.txt");
        std::fs::write(&path, b"stack trace").unwrap();

        let request = build_create_request(CreateArgs {
            launch_uuid: "launch".to_string(),
            item_uuid: None,
            message: "failure".to_string(),
            level: "error".to_string(),
            attach: Some(path),
            mime: "text/plain".to_string(),
        })
        .await
        .unwrap();

        let attach = request.attach.unwrap();
        assert_eq!(request.level, LogLevel::Error);
        assert_eq!(attach.name, "trace.txt");
        assert_eq!(attach.mime_type, "text/plain");
        assert_eq!(attach.data, b"stack trace");
    }

    #[tokio::test]
    async fn test_build_create_request_rejects_bad_level() {
        let result = build_create_request(CreateArgs {
            launch_uuid: "launch".to_string(),
            item_uuid: None,
            message: "m".to_string(),
            level: "loud".to_string(),
            attach: None,
            mime: "text/plain".to_string(),
        })
        .await;

        assert!(result.is_err());
    }
}
