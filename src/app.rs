//! 交互菜单
//!
//! 只把操作员的选择翻译成对编排层的调用，不包含业务逻辑。

use crate::clients::CourseClient;
use crate::config::Config;
use crate::models::{self, DocumentRef, MaterialId};
use crate::orchestrator::BatchProcessor;
use crate::utils::logging;
use crate::workflow::{ItemCtx, ItemOutcome};
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info, warn};

type InputLines = Lines<BufReader<Stdin>>;

/// 应用主结构
pub struct App {
    config: Config,
    processor: BatchProcessor,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config);

        let client = Arc::new(CourseClient::new(&config)?);
        let processor = BatchProcessor::new(client, &config);

        Ok(Self { config, processor })
    }

    /// 运行菜单循环，直到选择退出或输入结束
    pub async fn run(&self) -> Result<()> {
        let mut input = BufReader::new(tokio::io::stdin()).lines();

        loop {
            println!("\n选项:");
            println!("1. 用单个文档测试");
            println!("2. 处理全部文档");
            println!("3. 手动创建课程（使用已有资料 ID）");
            println!("4. 退出");

            let Some(choice) = prompt(&mut input, "\n请输入选项 (1-4): ").await? else {
                break;
            };

            match choice.as_str() {
                "1" => self.test_single_document().await,
                "2" => {
                    let confirm = prompt(
                        &mut input,
                        &format!(
                            "⚠️ 将处理 {} 中的全部 .{} 文件，是否继续? (y/N): ",
                            self.config.input_folder, self.config.document_extension
                        ),
                    )
                    .await?;
                    if confirm.is_some_and(|c| c.eq_ignore_ascii_case("y")) {
                        self.process_all_documents().await;
                    }
                }
                "3" => self.manual_course_creation(&mut input).await?,
                "4" => break,
                _ => warn!("❌ 无效选项，请输入 1-4"),
            }
        }

        info!("👋 再见!");
        Ok(())
    }

    /// 用第一个文档跑一遍完整流程
    async fn test_single_document(&self) {
        let document = match models::load_first_document(
            &self.config.input_folder,
            &self.config.document_extension,
        )
        .await
        {
            Ok(Some(document)) => document,
            Ok(None) => return,
            Err(e) => {
                error!("❌ {:#}", e);
                return;
            }
        };

        info!("🧪 使用文档测试: {}", document.file_name());
        self.run_batch(vec![document]).await;
    }

    async fn process_all_documents(&self) {
        match models::load_all_documents(
            &self.config.input_folder,
            &self.config.document_extension,
        )
        .await
        {
            Ok(documents) => self.run_batch(documents).await,
            Err(e) => error!("❌ {:#}", e),
        }
    }

    async fn run_batch(&self, documents: Vec<DocumentRef>) {
        let cancel = self.processor.cancel_signal();
        cancel.reset();
        let ctrl_c = cancel.listen_for_ctrl_c();

        let summary = self.processor.run(&documents).await;
        ctrl_c.abort();

        logging::print_final_stats(&summary, &self.config.output_log_file);
    }

    /// 使用已有资料 ID 创建课程（跳过上传）
    async fn manual_course_creation(&self, input: &mut InputLines) -> Result<()> {
        let session = match self.processor.authenticate().await {
            Ok(session) => session,
            Err(e) => {
                error!("❌ {}", e);
                return Ok(());
            }
        };

        let raw_id = prompt(input, "请输入资料 ID: ").await?.unwrap_or_default();
        let Some(material_id) = MaterialId::parse(raw_id) else {
            error!("❌ 未提供资料 ID");
            return Ok(());
        };

        let name = prompt(input, "请输入课程名称（可选）: ")
            .await?
            .filter(|n| !n.is_empty());

        let ctx = ItemCtx::single(material_id.as_str());
        let cancel = self.processor.cancel_signal();
        cancel.reset();
        let ctrl_c = cancel.listen_for_ctrl_c();

        let result = cancel
            .run_until_cancelled(self.processor.flow().run_from_materials(
                &session,
                std::slice::from_ref(&material_id),
                name.as_deref(),
                &ctx,
            ))
            .await;
        ctrl_c.abort();

        match result {
            Some(Ok(ItemOutcome::Success(course))) => {
                info!("🎉 课程创建并发布成功! 课程 ID: {}", course.course_id)
            }
            Some(Ok(ItemOutcome::Failed(failure))) => {
                error!("❌ 手动创建失败 [{}]: {}", failure.stage(), failure)
            }
            Some(Err(e)) => error!("❌ 处理过程中发生意外错误: {:#}", e),
            None => warn!(
                "⏹️ 已中断，课程状态未知，请人工核对资料 ID: {}",
                material_id
            ),
        }

        Ok(())
    }
}

/// 输出提示并读取一行；输入结束或 Ctrl-C 时返回 `None`
async fn prompt(input: &mut InputLines, text: &str) -> Result<Option<String>> {
    print!("{}", text);
    std::io::stdout().flush()?;

    tokio::select! {
        line = input.next_line() => Ok(line?.map(|l| l.trim().to_string())),
        _ = tokio::signal::ctrl_c() => Ok(None),
    }
}
