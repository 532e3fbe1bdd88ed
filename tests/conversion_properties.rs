use std::collections::HashSet;

use topic_template::{ConvertOptions, NameToIdMapper, TopicIdentity, convert, convert_with, validate};

fn shuffled_taxonomy() -> String {
    let mut csv = String::from("phase,section,topic,prompt,tags\n");
    let rows = [
        ("Discover", "Interviews", "Pain points", "x"),
        ("Define", "Scope", "Goals", "y"),
        ("Discover", "Surveys", "Pain points", "x"),
        ("Discover", "Interviews", "Budget", "z"),
        ("Deliver", "Launch", "Goals", "x"),
        ("Define", "Interviews", "Risks", "y"),
        ("Discover", "Interviews", "Pain points", "w"),
    ];
    for (phase, section, topic, tag) in rows {
        csv.push_str(&format!("{phase},{section},{topic},Ask about {topic},{tag}\n"));
    }
    csv
}

#[test]
fn phases_follow_first_seen_order() -> anyhow::Result<()> {
    let template = convert(&shuffled_taxonomy(), "n", "d")?;

    let names = template
        .phases
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Discover", "Define", "Deliver"]);
    assert!(template.phases.iter().all(|p| p.description.is_empty()));

    Ok(())
}

#[test]
fn sections_keep_the_phase_of_their_first_row() -> anyhow::Result<()> {
    let template = convert(&shuffled_taxonomy(), "n", "d")?;

    let discover = &template.phases[0].id;
    let define = &template.phases[1].id;
    let listed = template
        .sections
        .iter()
        .map(|s| (s.name.as_str(), s.phase_id == *discover, s.index))
        .collect::<Vec<_>>();
    assert_eq!(
        listed,
        vec![
            ("Interviews", true, 1),
            ("Surveys", true, 2),
            ("Scope", false, 1),
            // Same name reappears under Define; it is listed there with the shared id.
            ("Interviews", false, 2),
            ("Launch", false, 1),
        ]
    );
    assert_eq!(template.sections[3].phase_id, *define);

    Ok(())
}

#[test]
fn topic_indexes_are_dense_and_increasing() -> anyhow::Result<()> {
    for identity in [TopicIdentity::ByTitle, TopicIdentity::BySection] {
        let options = ConvertOptions {
            topic_identity: identity,
            ..ConvertOptions::default()
        };
        let template = convert_with(&shuffled_taxonomy(), "n", "d", &options)?;

        let indexes = template.topics.iter().map(|t| t.index).collect::<Vec<_>>();
        let expected = (1..=template.topics.len()).collect::<Vec<_>>();
        assert_eq!(indexes, expected, "identity {identity:?}");
    }

    Ok(())
}

#[test]
fn by_title_merges_topics_and_dedupes_tags() -> anyhow::Result<()> {
    let template = convert(&shuffled_taxonomy(), "n", "d")?;

    let titles = template
        .topics
        .iter()
        .map(|t| t.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Pain points", "Goals", "Budget", "Risks"]);

    let pain = &template.topics[0];
    assert_eq!(pain.tags, vec!["x", "w"]);
    assert_eq!(pain.section_id, template.sections[0].id);

    assert_eq!(template.tags, vec!["w", "x", "y", "z"]);

    Ok(())
}

#[test]
fn every_topic_points_at_a_listed_section_and_phase() -> anyhow::Result<()> {
    let template = convert(&shuffled_taxonomy(), "n", "d")?;

    let phase_ids = template
        .phases
        .iter()
        .map(|p| p.id.as_str())
        .collect::<HashSet<_>>();
    let section_ids = template
        .sections
        .iter()
        .map(|s| s.id.as_str())
        .collect::<HashSet<_>>();
    for topic in &template.topics {
        assert!(phase_ids.contains(topic.phase_id.as_str()));
        assert!(section_ids.contains(topic.section_id.as_str()));
    }

    Ok(())
}

#[test]
fn separate_runs_allocate_fresh_ids() -> anyhow::Result<()> {
    let first = convert(&shuffled_taxonomy(), "n", "d")?;
    let second = convert(&shuffled_taxonomy(), "n", "d")?;

    assert_ne!(first.id, second.id);
    assert_ne!(first.phases[0].id, second.phases[0].id);

    Ok(())
}

#[test]
fn name_collisions_across_kinds_get_independent_ids() -> anyhow::Result<()> {
    let template = convert("phase,section,topic\nSame,Same,Same\n", "n", "d")?;

    let ids = [
        template.phases[0].id.as_str(),
        template.sections[0].id.as_str(),
        template.topics[0].id.as_str(),
    ];
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 3);

    Ok(())
}

#[test]
fn missing_topic_column_blocks_conversion() {
    let csv = "phase,section,prompt\nP,S,p\n";

    let result = validate(csv);
    assert!(!result.is_valid);
    assert!(result.errors.iter().any(|e| e.contains("topic")));

    let err = convert(csv, "n", "d").unwrap_err();
    assert!(err.to_string().contains("Missing required column: topic"));
}

#[test]
fn mapper_is_stable_within_one_instance() {
    let mut mapper = NameToIdMapper::new();
    let a = mapper.get_or_create_id("a").to_owned();
    let b = mapper.get_or_create_id("b").to_owned();

    assert_eq!(mapper.get_or_create_id("a"), a);
    assert_ne!(a, b);
    assert_eq!(mapper.len(), 2);
}

#[test]
fn whitespace_only_lines_are_skipped_by_conversion() -> anyhow::Result<()> {
    let template = convert("phase,section,topic,prompt\nP,S,T,p\n   \nP,S,U,p\n \t\n", "n", "d")?;

    let titles = template
        .topics
        .iter()
        .map(|t| (t.title.as_str(), t.index))
        .collect::<Vec<_>>();
    assert_eq!(titles, vec![("T", 1), ("U", 2)]);

    Ok(())
}

#[test]
fn crlf_input_converts_like_lf_input() -> anyhow::Result<()> {
    let template = convert(
        "phase,section,topic,prompt,tags\r\nP1,S1,T1,p,a\r\nP1,S2,T2,p,b\r\n",
        "n",
        "d",
    )?;

    assert_eq!(template.sections.len(), 2);
    assert_eq!(template.topics[1].title, "T2");
    assert_eq!(template.tags, vec!["a", "b"]);

    Ok(())
}

#[test]
fn parse_failure_surfaces_as_collected_validation_error() {
    let err = convert("phase,section,topic\nP,S,T\nP,S\n", "n", "d").unwrap_err();

    let errors = err.validation_errors().unwrap_or_default();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("CSV parse error: line 3 has 2 columns, expected 3"));
}
