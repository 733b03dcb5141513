//! Prompt construction for the remote text optimizer

use crate::curate::selector::SelectionResult;
use crate::job::JobDescription;
use crate::optimize::rewritable_texts;

const REWRITE_TEMPLATE: &str = r#"TASK: You are a professional resume writer. Rephrase the numbered resume lines below so they speak the vocabulary of the target job.

RULES:
1. Never invent achievements, numbers or technologies; keep every number, metric and proper noun from the source line.
2. Never make a line longer than the original.
3. Prefer the job's own terms where the source supports them.
4. Keep a professional tone and active voice.

<JOB>
Title: {title}
Required skills: {required}
Preferred skills: {preferred}
Keywords: {keywords}
</JOB>

<LINES>
{lines}
</LINES>

Reply with JSON only, no prose, using this exact structure:
{"rewrites": [{"index": 0, "text": "rewritten line"}, ...]}

Omit any line you cannot improve."#;

/// Render the rewrite prompt for the selection's rewritable texts. Line
/// indices match the order of [`rewritable_texts`].
pub fn rewrite_prompt(selection: &SelectionResult, job: &JobDescription) -> String {
    let lines = rewritable_texts(selection)
        .iter()
        .enumerate()
        .map(|(index, (_, text))| format!("{}. {}", index, text))
        .collect::<Vec<_>>()
        .join("\n");

    REWRITE_TEMPLATE
        .replace("{title}", &job.title)
        .replace("{required}", &job.required_skills.join(", "))
        .replace("{preferred}", &job.preferred_skills.join(", "))
        .replace("{keywords}", &job.keywords.join(", "))
        .replace("{lines}", &lines)
}
