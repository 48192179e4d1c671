//! End-to-end: a viewing session persisting through the memory store.

use learn_client::MemoryStore;
use learn_module::{
    AnswerValue, ContentBlock, ContentBody, Difficulty, Level, Module, ModuleSession,
    ModuleSettings, QuestionKind, QuizQuestion, Section,
};
use std::sync::Arc;

fn sample_module() -> Module {
    let block = |id: &str, text: &str| ContentBlock {
        id: id.to_string(),
        body: ContentBody::Text(text.to_string()),
        metadata: None,
    };
    Module {
        id: "photosynthesis-101".to_string(),
        title: "Photosynthesis".to_string(),
        description: "How plants turn light into sugar".to_string(),
        subject: "Biology".to_string(),
        level: Level::Beginner,
        estimated_duration: 45,
        learning_objectives: Vec::new(),
        sections: vec![
            Section {
                id: "s1".to_string(),
                title: "Light reactions".to_string(),
                description: String::new(),
                content: vec![block("b1", "intro"), block("b2", "details")],
                quiz: vec![QuizQuestion {
                    id: "q1".to_string(),
                    kind: QuestionKind::TrueFalse,
                    prompt: "Chlorophyll absorbs light.".to_string(),
                    options: Vec::new(),
                    correct_answer: AnswerValue::from("true"),
                    explanation: String::new(),
                    points: 5,
                    difficulty: Difficulty::Easy,
                    hints: Vec::new(),
                }],
                estimated_time: 20,
                is_required: true,
            },
            Section {
                id: "s2".to_string(),
                title: "Dark reactions".to_string(),
                description: String::new(),
                content: vec![block("b1", "calvin cycle")],
                quiz: Vec::new(),
                estimated_time: 25,
                is_required: true,
            },
        ],
        final_assessment: Vec::new(),
        resources: Vec::new(),
        tags: vec!["biology".to_string()],
    }
}

#[test]
fn session_state_survives_reopen() {
    let store = Arc::new(MemoryStore::new());

    {
        let mut session = ModuleSession::open(
            sample_module(),
            "student-1",
            ModuleSettings::default(),
            Arc::clone(&store),
        )
        .expect("open");

        session.advance();
        session.toggle_bookmark();
        session.add_note("revisit the diagram", vec!["review".to_string()]);

        session.start_section_quiz();
        session.answer_question("q1", "true");
        let outcome = session.submit_quiz().expect("submit");
        assert_eq!(outcome.score, 100);

        session.advance(); // into s2
    }

    let session = ModuleSession::open(
        sample_module(),
        "student-1",
        ModuleSettings::default(),
        Arc::clone(&store),
    )
    .expect("reopen");

    assert_eq!(session.navigator().section_index(), 1);
    assert_eq!(session.progress().quiz_scores["s1"], 100);
    assert_eq!(session.notebook().len(), 1);
    assert!(session.progress().is_bookmarked("s1-b2"));

    let report = session.report();
    assert_eq!(report.completed_quizzes, 1);
    assert_eq!(report.total_quizzes, 1);
    assert!((report.average_quiz_score - 100.0).abs() < f64::EPSILON);
}

#[test]
fn stores_are_isolated_per_student() {
    let store = Arc::new(MemoryStore::new());

    let mut first = ModuleSession::open(
        sample_module(),
        "student-1",
        ModuleSettings::default(),
        Arc::clone(&store),
    )
    .expect("open first");
    first.add_note("mine", Vec::new());

    let second = ModuleSession::open(
        sample_module(),
        "student-2",
        ModuleSettings::default(),
        Arc::clone(&store),
    )
    .expect("open second");

    assert_eq!(second.notebook().len(), 0);
    assert_eq!(store.len(), 1);
}
