//! Prompt rendering for scoring calls.
//!
//! Prompts grow with the deliberation: the baseline prompt is identical for
//! every role, round prompts embed the previous round's assessments and a
//! scope-indexed task, and stance prompts add adversarial framing. The core
//! never talks to a model itself; rendered prompts go through whatever
//! [`ScoreProvider`](crate::provider::ScoreProvider) is injected.

use crate::provider::PromptContext;
use crate::types::{Role, Stance};
use std::fmt::Write;

/// Role preamble shared by every prompt.
fn role_preamble(role: Role) -> &'static str {
    match role {
        Role::Principle => {
            "You are the principle perspective. Judge whether the explanation's \
             reasoning is logically sound."
        }
        Role::Expression => {
            "You are the expression perspective. Judge whether the explanation \
             is clear and comprehensible to its audience."
        }
        Role::Audit => {
            "You are the audit perspective. Look for what is wrong, missing, or \
             overstated. Remain skeptical."
        }
    }
}

/// Task instruction for a given thought scope.
///
/// The ladder widens with the Fibonacci scope: narrow cross-checks first,
/// full synthesis and counterargument generation later.
fn scope_task(scope: u64) -> String {
    match scope {
        0 | 1 => "Task: re-evaluate your assessment against one other \
                  perspective's reasoning."
            .to_string(),
        2 => "Task: analyze the tension between two differing points of view."
            .to_string(),
        3 => "Task: synthesize all three perspectives into a more holistic \
              judgment."
            .to_string(),
        n => format!(
            "Task: generate {n} alternative interpretations or counterarguments \
             to test the robustness of the current consensus."
        ),
    }
}

/// Stance framing for adversarial passes.
fn stance_framing(stance: Stance) -> &'static str {
    match stance {
        Stance::Advocate => {
            "Adopt the advocate stance: construct the strongest honest case \
             that this explanation succeeds, then score it."
        }
        Stance::Critic => {
            "Adopt the critic stance: construct the strongest honest case \
             that this explanation fails, then score it."
        }
    }
}

/// Render the full prompt for a role in the given context.
pub fn render(role: Role, ctx: &PromptContext<'_>) -> String {
    let mut prompt = String::new();
    prompt.push_str(role_preamble(role));
    prompt.push('\n');

    if let Some(stance) = ctx.stance {
        prompt.push_str(stance_framing(stance));
        prompt.push('\n');
    }

    if ctx.round > 0 {
        let _ = writeln!(
            prompt,
            "This is reflection round {} with thought scope {}.",
            ctx.round, ctx.scope
        );
    }

    let _ = writeln!(prompt, "Explanation under evaluation:\n'{}'", ctx.explanation);

    if let Some(previous) = ctx.previous {
        prompt.push_str("\nPrevious round of assessments:\n");
        for (prev_role, assessment) in previous.iter() {
            let _ = writeln!(
                prompt,
                "- {} ({:.1}): {}",
                prev_role, assessment.score, assessment.rationale
            );
        }
    }

    if ctx.round > 0 {
        prompt.push('\n');
        prompt.push_str(&scope_task(ctx.scope));
        prompt.push('\n');
    }

    prompt.push_str("\nReturn a score from 0 to 10 with a short rationale.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Assessment, ScoreSet};

    #[test]
    fn baseline_prompt_mentions_role_and_text() {
        let ctx = PromptContext::baseline("The sky is blue because of scattering.");
        let prompt = render(Role::Principle, &ctx);
        assert!(prompt.contains("principle perspective"));
        assert!(prompt.contains("scattering"));
        assert!(!prompt.contains("reflection round"));
    }

    #[test]
    fn round_prompt_embeds_previous_assessments() {
        let mut prev = ScoreSet::new();
        prev.insert(Role::Audit, Assessment::new(5.5, "missing caveats"));
        let ctx = PromptContext::round("text here", 2, 3, Some(&prev));
        let prompt = render(Role::Expression, &ctx);
        assert!(prompt.contains("reflection round 2"));
        assert!(prompt.contains("thought scope 3"));
        assert!(prompt.contains("missing caveats"));
        assert!(prompt.contains("synthesize all three perspectives"));
    }

    #[test]
    fn prompts_widen_with_scope() {
        let narrow = render(Role::Audit, &PromptContext::round("t", 1, 1, None));
        let wide = render(Role::Audit, &PromptContext::round("t", 4, 8, None));
        assert!(narrow.contains("one other"));
        assert!(wide.contains("8 alternative interpretations"));
    }

    #[test]
    fn stance_prompt_carries_framing() {
        let ctx = PromptContext::stance("some claim", Stance::Critic);
        let prompt = render(Role::Principle, &ctx);
        assert!(prompt.contains("critic stance"));
    }
}
