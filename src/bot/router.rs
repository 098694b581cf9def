//! Command router - turns one invocation into exactly one reply string.
//!
//! Both commands share one pipeline (fetch, validate, format); condensing the
//! extract is the only step that differs between them. Every failure is
//! converted to a fixed user-facing message here, nothing propagates out.

use tracing::warn;

use crate::bot::openai::Condense;
use crate::bot::wikipedia::SummaryFetch;

pub const AMBIGUOUS_REPLY: &str = "Your query is ambiguous. Please be more specific.";
pub const NO_SUMMARY_REPLY: &str = "Sorry, I couldn't find a summary for that page.";
pub const WIKI_FAILED_REPLY: &str = "Sorry, I couldn't fetch that Wikipedia page.";
pub const SUMMARIZE_FAILED_REPLY: &str =
    "Sorry, I couldn't fetch or summarize that Wikipedia page.";

/// The two registered slash commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandName {
    Wiki,
    Summarize,
}

impl CommandName {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "wiki" => Some(Self::Wiki),
            "summarize" => Some(Self::Summarize),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wiki => "wiki",
            Self::Summarize => "summarize",
        }
    }

    fn failure_reply(&self) -> &'static str {
        match self {
            Self::Wiki => WIKI_FAILED_REPLY,
            Self::Summarize => SUMMARIZE_FAILED_REPLY,
        }
    }
}

/// One slash-command event, alive only while it is handled.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub command: CommandName,
    pub query: String,
}

fn format_reply(title: &str, body: &str, url: &str) -> String {
    format!("**{title}**\n\n{body}\n\nRead more: {url}")
}

/// Handle one invocation. Never fails; every error path ends in one of the
/// fixed reply strings.
pub async fn handle<F, C>(invocation: &Invocation, fetcher: &F, condenser: &C) -> String
where
    F: SummaryFetch + Sync,
    C: Condense + Sync,
{
    let summary = match fetcher.fetch_summary(&invocation.query).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Summary fetch failed for {:?}: {e}", invocation.query);
            return invocation.command.failure_reply().to_string();
        }
    };

    // A summary only moves on when it is unambiguous and non-empty.
    if summary.is_disambiguation {
        return AMBIGUOUS_REPLY.to_string();
    }
    if summary.extract.is_empty() {
        return NO_SUMMARY_REPLY.to_string();
    }

    let body = match invocation.command {
        CommandName::Wiki => summary.extract,
        CommandName::Summarize => match condenser.condense(&summary.extract).await {
            Ok(condensed) => condensed,
            Err(e) => {
                warn!("Condense failed for {:?}: {e}", invocation.query);
                return SUMMARIZE_FAILED_REPLY.to_string();
            }
        },
    };

    format_reply(&summary.title, &body, &summary.url)
}
