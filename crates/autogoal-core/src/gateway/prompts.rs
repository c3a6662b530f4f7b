//! Prompt templates and completion parsing for the direct gateway

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a JSON array made only of string literals
static STRING_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[\s*(?:"(?:[^"\\]|\\.)*"\s*,?\s*)*\]"#).expect("valid task array pattern")
});

/// An entry that only says "nothing left to do" instead of returning `[]`
static NO_OP_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:no (?:new|further|additional|more) tasks?(?: (?:are )?(?:needed|required))?|(?:all )?tasks? (?:is |are )?complete(?:d)?|goal (?:is )?achieved|none)[.!]?$",
    )
    .expect("valid no-op pattern")
});

pub fn decompose(goal: &str) -> String {
    format!(
        "You are an autonomous task creation AI called AutoGoal. You have the following \
         objective `{goal}`. Create a list of zero to three tasks to be completed by your AI \
         system such that your goal is more closely reached or completely reached. Return the \
         response as a JSON array of strings and NOTHING ELSE."
    )
}

pub fn execute(goal: &str, task: &str) -> String {
    format!(
        "You are an autonomous task execution AI called AutoGoal. You have the following \
         objective `{goal}`. You have the following task `{task}`. Execute the task and return \
         the response as a string."
    )
}

pub fn plan(goal: &str, pending: &[String], last_task: &str, last_result: &str) -> String {
    let pending = serde_json::to_string(pending).unwrap_or_else(|_| "[]".to_string());
    format!(
        "You are an AI task creation agent. You have the following objective `{goal}`. You \
         have the following incomplete tasks `{pending}` and have just executed the following \
         task `{last_task}` and received the following result `{last_result}`. Based on this, \
         create a new task to be completed by your AI system ONLY IF NEEDED such that your goal \
         is more closely reached or completely reached. Return the response as a JSON array of \
         strings and NOTHING ELSE."
    )
}

/// Extract the task list from a decompose/plan completion
///
/// Drops blank entries, tasks already completed, and entries that only
/// announce there is nothing left to do. A completion with no string
/// array at all is an error.
pub fn parse_task_list(completion: &str, completed: &[String]) -> Result<Vec<String>> {
    let Some(tasks) = STRING_ARRAY
        .find_iter(completion)
        .find_map(|m| serde_json::from_str::<Vec<String>>(m.as_str()).ok())
    else {
        bail!("Completion did not contain a task array");
    };

    Ok(tasks
        .into_iter()
        .map(|task| task.trim().to_string())
        .filter(|task| !task.is_empty())
        .filter(|task| !completed.iter().any(|done| done == task))
        .filter(|task| !is_no_op(task))
        .collect())
}

fn is_no_op(task: &str) -> bool {
    NO_OP_ENTRY.is_match(task)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_array() {
        let tasks = parse_task_list(r#"["draft haiku", "refine haiku"]"#, &[]).unwrap();
        assert_eq!(tasks, vec!["draft haiku", "refine haiku"]);
    }

    #[test]
    fn test_parse_array_in_prose_and_fence() {
        let completion = "Sure! Here are the tasks:\n```json\n[\n  \"Research topic\",\n  \"Write \\\"outline\\\"\"\n]\n```\nGood luck.";
        let tasks = parse_task_list(completion, &[]).unwrap();
        assert_eq!(tasks, vec!["Research topic", "Write \"outline\""]);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_task_list("[]", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_missing_array_is_error() {
        assert!(parse_task_list("I could not think of anything.", &[]).is_err());
    }

    #[test]
    fn test_filters_completed_and_no_op_entries() {
        let completed = vec!["draft haiku".to_string()];
        let completion =
            r#"["draft haiku", "  ", "No new tasks needed", "Publish haiku", "None"]"#;
        let tasks = parse_task_list(completion, &completed).unwrap();
        assert_eq!(tasks, vec!["Publish haiku"]);
    }

    #[test]
    fn test_keeps_tasks_that_mention_completion() {
        let completion = r#"["Verify task completeness against the rubric", "Confirm the goal achieved its KPI targets", "Write summary", "No new tasks needed.", "Goal achieved!", "All tasks completed"]"#;
        let tasks = parse_task_list(completion, &[]).unwrap();
        assert_eq!(
            tasks,
            vec![
                "Verify task completeness against the rubric",
                "Confirm the goal achieved its KPI targets",
                "Write summary",
            ]
        );
    }

    #[test]
    fn test_plan_prompt_includes_context() {
        let pending = vec!["b".to_string()];
        let prompt = plan("goal", &pending, "a", "result of a");
        assert!(prompt.contains("`goal`"));
        assert!(prompt.contains(r#"`["b"]`"#));
        assert!(prompt.contains("`a`"));
        assert!(prompt.contains("`result of a`"));
    }
}
