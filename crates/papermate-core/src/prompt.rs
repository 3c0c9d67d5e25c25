//! Fixed prompt text sent to the model.
//!
//! Kept in one module so wording changes never touch control flow.

/// Separator between section files when concatenated into one context.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// Label prefixed to the compressed-history system message.
pub const SUMMARY_OF_PRIOR_PREFIX: &str = "summary of prior conversation: ";

/// System instruction for the question-answering call.
pub const QA_SYSTEM: &str = "You are a rigorous paper question-answering assistant. You must answer \
the latest user question strictly from the supplied paper context and the summary of our prior \
conversation. If the context does not cover the question, reason it out yourself, and start your \
answer with: \"The provided paper content does not cover this question; based on my own \
understanding, \"";

/// Disclaimer sentence the model is instructed to prefix when answering
/// from general knowledge. Kept in sync with [`QA_SYSTEM`].
pub const KNOWLEDGE_DISCLAIMER: &str =
    "The provided paper content does not cover this question; based on my own understanding, ";

/// Label introducing the paper context in the first-turn user message.
pub const CONTEXT_LABEL: &str = "[paper context]";

/// Label introducing the question in the first-turn user message.
pub const QUESTION_LABEL: &str = "[user question]";

/// System instruction for the history-compression call.
pub const COMPRESS_SYSTEM: &str = "You are a conversation summarization assistant. Compress a \
multi-turn dialogue into one short summary that preserves every key fact, question and \
conclusion. The summary will serve as the context memory for the next turn.";

/// User-message wrapper around the serialized transcript.
pub const COMPRESS_REQUEST: &str =
    "Compress the following conversation history into a single summary:";

/// System instruction for the one-shot paper analysis.
pub const SUMMARY_SYSTEM: &str = "You are a professional research analyst in the AI field. You \
will receive the pre-processed content of an academic paper. Your task is to analyze and \
interpret the paper thoroughly, comprehensively and in a structured way.";

/// The structured analysis request. The model must address each numbered
/// part in order.
pub const SUMMARY_REQUEST: &str = "Using the paper content provided below, produce a detailed \
analysis report. The report must follow this exact structure and answer every part in depth:

1.  **Basic information**: What is the paper's title? Who are the authors?
2.  **Paper structure**: Briefly describe how the paper is organized (e.g. introduction, related work, method, experiments, conclusion).
3.  **Literature review**: Locate the section that surveys prior work (usually titled \"Related Work\"). List the main research directions, key models or representative works it covers, with a short explanation of each.
4.  **Problem statement**: What core scientific problem or technical challenge does this paper set out to solve?
5.  **Methodology**: What solution, key method, model architecture or algorithm do the authors propose?
6.  **Key formulas**: Explain the most important formulas, their principles and their role in the paper. (If there are no explicit formulas, state that the paper provides none.)
7.  **Key findings and results**: What are the most important experimental conclusions or results?
8.  **Value and contribution**: What are the main contributions and academic value of this work, and how does it compare to related work?
9.  **Critical analysis and outlook**: Now act as a senior reviewer in this field. Going beyond the paper's own claims and drawing on your broader knowledge, evaluate: innovation (how novel is the core idea?), potential impact (what long-term influence could it have?), technical limitations (what weaknesses might the method or experiments have?), and future work (what follow-up directions are worth exploring?).";

/// Label introducing the paper content in the analysis request.
pub const SUMMARY_CONTEXT_LABEL: &str = "[paper content]";
