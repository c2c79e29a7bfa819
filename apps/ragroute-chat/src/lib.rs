//! Interactive terminal chat over [`RagService`], one random user per run.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use ragroute_service::{ProcessRequest, RagService};

pub const PROMPT: &str = "질문을 입력해주세요 > ";
pub const ANSWER_PREFIX: &str = "🤖 답변: ";
pub const GOODBYE: &str = "종료합니다.";

#[derive(Debug, Parser)]
#[command(
	version = ragroute_cli::VERSION,
	rename_all = "kebab",
	styles = ragroute_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

/// Why the chat loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatExit {
	EmptyLine,
	EndOfInput,
	Idle,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = ragroute_config::load(&args.config)?;

	ragroute_cli::init_tracing_stderr(&config.service.log_level);

	let service = RagService::new(config);
	let idle = service.sessions.timeout();
	let user_id = uuid::Uuid::new_v4().to_string();
	let exit =
		chat_loop(&service, &user_id, BufReader::new(io::stdin()), io::stdout(), idle).await?;

	tracing::debug!(?exit, %user_id, "Chat ended.");

	Ok(())
}

/// Reads questions line by line until an empty line, end of input, or `idle` without input.
///
/// A failed request is reported and the loop continues.
pub async fn chat_loop<R, W>(
	service: &RagService,
	user_id: &str,
	input: R,
	mut output: W,
	idle: Duration,
) -> io::Result<ChatExit>
where
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	let mut lines = input.lines();

	loop {
		output.write_all(PROMPT.as_bytes()).await?;
		output.flush().await?;

		let line = match tokio::time::timeout(idle, lines.next_line()).await {
			Ok(line) => line?,
			Err(_) => {
				let notice = format!("\n{} 동안 입력이 없어 챗봇을 종료합니다.\n", describe(idle));

				output.write_all(notice.as_bytes()).await?;
				output.flush().await?;

				return Ok(ChatExit::Idle);
			},
		};
		let Some(line) = line else {
			output.write_all(b"\n").await?;
			output.flush().await?;

			return Ok(ChatExit::EndOfInput);
		};
		let question = line.trim();

		if question.is_empty() {
			output.write_all(format!("{GOODBYE}\n").as_bytes()).await?;
			output.flush().await?;

			return Ok(ChatExit::EmptyLine);
		}

		let request = ProcessRequest {
			question: question.to_string(),
			user_id: user_id.to_string(),
			category: None,
		};
		let reply = match service.process(request).await {
			Ok(answer) => format!("{ANSWER_PREFIX}{}\n", answer.generation),
			Err(err) => {
				tracing::warn!(error = %err, "Chat request failed.");

				format!("⚠️ 오류: {err}\n")
			},
		};

		output.write_all(reply.as_bytes()).await?;
	}
}

fn describe(idle: Duration) -> String {
	let secs = idle.as_secs();

	if secs >= 60 && secs % 60 == 0 { format!("{}분", secs / 60) } else { format!("{secs}초") }
}
