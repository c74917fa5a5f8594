use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizdesk_core::model::{AnswerValue, Answers, Question, QuestionKind};
use quizdesk_core::scoring::score;

fn make_questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| {
            let kind = match i % 4 {
                0 => QuestionKind::MultipleChoiceSingle {
                    options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    correct_answer: "B".into(),
                },
                1 => QuestionKind::MultipleChoiceMultiple {
                    options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    correct_answer: vec!["A".into(), "C".into()],
                },
                2 => QuestionKind::TrueFalse {
                    correct_answer: "True".into(),
                },
                _ => QuestionKind::ShortAnswer {
                    correct_answer: Some("photosynthesis".into()),
                },
            };
            Question {
                text: format!("Question {i}"),
                weight: 1.0 + (i % 3) as f64,
                kind,
            }
        })
        .collect()
}

fn make_answers(n: usize, correct: bool) -> Answers {
    (0..n)
        .map(|i| {
            let value = match (i % 4, correct) {
                (0, true) => AnswerValue::Text("B".into()),
                (1, true) => AnswerValue::Choices(vec!["C".into(), "A".into()]),
                (2, true) => AnswerValue::Text(" True ".into()),
                (3, true) => AnswerValue::Text("photosynthesis".into()),
                (1, false) => AnswerValue::Choices(vec!["A".into()]),
                _ => AnswerValue::Text("wrong".into()),
            };
            (i.to_string(), value)
        })
        .collect()
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");

    for n in [10, 100, 1000] {
        let questions = make_questions(n);
        let all_right = make_answers(n, true);
        let all_wrong = make_answers(n, false);

        group.bench_function(format!("n={n},all_correct"), |b| {
            b.iter(|| score(black_box(&questions), black_box(&all_right)))
        });

        group.bench_function(format!("n={n},all_wrong"), |b| {
            b.iter(|| score(black_box(&questions), black_box(&all_wrong)))
        });
    }

    group.bench_function("n=100,unanswered", |b| {
        let questions = make_questions(100);
        let empty = Answers::new();
        b.iter(|| score(black_box(&questions), black_box(&empty)))
    });

    group.finish();
}

criterion_group!(benches, bench_score);
criterion_main!(benches);
