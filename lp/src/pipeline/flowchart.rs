//! Mermaid flowchart rendering

use std::fmt::Write;

use crate::domain::LearningPath;

/// Render a normalized learning path as a Mermaid `graph TD`
///
/// Node ids depend only on topic position; labels are entity-escaped so
/// model text cannot break the diagram.
pub fn render(path: &LearningPath) -> String {
    let mut out = String::from("graph TD\n");
    // Writing into a String cannot fail
    let _ = writeln!(out, "    start([\"Start: {}\"])", escape(&path.title));

    for (i, topic) in path.topics.iter().enumerate() {
        let _ = writeln!(out, "    topic{i}[\"{}. {}\"]", i + 1, escape(&topic.name));
        let _ = writeln!(out, "    topic{i}_duration[\"Duration: {}\"]", escape(&topic.duration));
        let _ = writeln!(
            out,
            "    topic{i}_resources[\"{}\"]",
            count_label(topic.resources.len(), "resource")
        );
        let _ = writeln!(
            out,
            "    topic{i}_projects[\"{}\"]",
            count_label(topic.projects.len(), "project")
        );
    }
    let _ = writeln!(out, "    finish([\"Complete: {}\"])", escape(&path.total_duration));

    let mut previous = "start".to_string();
    for i in 0..path.topics.len() {
        let _ = writeln!(out, "    {previous} --> topic{i}");
        let _ = writeln!(out, "    topic{i} --> topic{i}_duration");
        let _ = writeln!(out, "    topic{i}_duration --> topic{i}_resources");
        let _ = writeln!(out, "    topic{i}_resources --> topic{i}_projects");
        previous = format!("topic{i}_projects");
    }
    let _ = writeln!(out, "    {previous} --> finish");

    out
}

fn count_label(n: usize, noun: &str) -> String {
    if n == 1 { format!("1 {noun}") } else { format!("{n} {noun}s") }
}

/// Mermaid entity escaping; whitespace runs (including newlines) become one space
fn escape(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    for c in collapsed.chars() {
        match c {
            '#' => out.push_str("#35;"),
            '"' => out.push_str("#quot;"),
            '<' => out.push_str("#lt;"),
            '>' => out.push_str("#gt;"),
            '&' => out.push_str("#amp;"),
            '[' => out.push_str("#91;"),
            ']' => out.push_str("#93;"),
            '{' => out.push_str("#123;"),
            '}' => out.push_str("#125;"),
            '|' => out.push_str("#124;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Topic, TopicDetails};
    use proptest::prelude::*;

    fn path(names: &[&str]) -> LearningPath {
        LearningPath {
            title: "Python Basics".to_string(),
            overview: "o".to_string(),
            total_duration: "3 weeks".to_string(),
            topics: names
                .iter()
                .map(|n| Topic {
                    name: n.to_string(),
                    duration: "1 week".to_string(),
                    description: "d".to_string(),
                    resources: TopicDetails::fallback().resources,
                    projects: vec![],
                    study_plan: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn test_render_structure() {
        let chart = render(&path(&["Syntax", "Functions"]));

        assert!(chart.starts_with("graph TD\n"));
        assert!(chart.contains("start([\"Start: Python Basics\"])"));
        assert!(chart.contains("topic0[\"1. Syntax\"]"));
        assert!(chart.contains("topic1_resources[\"1 resource\"]"));
        assert!(chart.contains("topic1_projects[\"0 projects\"]"));
        assert!(chart.contains("finish([\"Complete: 3 weeks\"])"));
        assert!(chart.contains("start --> topic0\n"));
        assert!(chart.contains("topic0_projects --> topic1\n"));
        assert!(chart.contains("topic1_projects --> finish\n"));
    }

    #[test]
    fn test_render_without_topics() {
        let chart = render(&path(&[]));
        assert!(chart.contains("start --> finish"));
        assert!(!chart.contains("topic0"));
    }

    #[test]
    fn test_escaping_neutralizes_mermaid_syntax() {
        let mut p = path(&["C# <generics> \"intro\""]);
        p.title = "Line one\nline two".to_string();
        let chart = render(&p);

        assert!(chart.contains("topic0[\"1. C#35; #lt;generics#gt; #quot;intro#quot;\"]"));
        assert!(chart.contains("Start: Line one line two"));
    }

    proptest! {
        #[test]
        fn prop_render_deterministic(names in prop::collection::vec("\\PC{0,20}", 0..6)) {
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let p = path(&refs);
            prop_assert_eq!(render(&p), render(&p.clone()));
        }

        #[test]
        fn prop_labels_never_contain_raw_quotes(name in "\\PC{0,30}") {
            let chart = render(&path(&[name.as_str()]));
            for line in chart.lines().filter(|l| l.trim_start().starts_with("topic0[")) {
                let inner = &line[line.find("[\"").unwrap() + 2..line.rfind("\"]").unwrap()];
                prop_assert!(!inner.contains('"'));
                prop_assert!(!inner.contains('<'));
            }
        }
    }
}
