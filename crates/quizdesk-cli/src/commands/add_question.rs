//! The `quizdesk add-question` command.

use anyhow::{anyhow, bail, Result};

use quizdesk_core::config::QuizdeskConfig;
use quizdesk_core::model::{Question, QuestionKind, QuestionType};
use quizdesk_core::parser::{lint_quiz, validate_question};

pub fn execute(
    config: &QuizdeskConfig,
    name: &str,
    question_type: &str,
    text: String,
    weight: f64,
    options: Vec<String>,
    answers: Vec<String>,
) -> Result<()> {
    let question_type: QuestionType = question_type.parse().map_err(|e: String| anyhow!(e))?;
    let kind = build_kind(question_type, options, answers)?;
    let question = Question { text, weight, kind };

    let store = super::store(config);
    let mut quiz = store.load(name)?;
    let number = quiz.questions.len() + 1;
    validate_question(number, &question)?;

    quiz.questions.push(question);
    store.save(&mut quiz)?;
    println!("Added question {number} to {name:?}");

    let warnings: Vec<_> = lint_quiz(&quiz)
        .into_iter()
        .filter(|w| w.question == Some(number))
        .collect();
    super::print_warnings(&warnings);
    Ok(())
}

/// Turn the flat command-line fields into a typed question body.
fn build_kind(
    question_type: QuestionType,
    options: Vec<String>,
    answers: Vec<String>,
) -> Result<QuestionKind> {
    let single_answer = |answers: Vec<String>| -> Result<Option<String>> {
        match answers.len() {
            0 => Ok(None),
            1 => Ok(answers.into_iter().next()),
            n => bail!("{question_type} takes one --answer, got {n}"),
        }
    };

    if !question_type.is_choice() && !options.is_empty() {
        tracing::warn!("--option is ignored for {question_type} questions");
    }

    let kind = match question_type {
        QuestionType::MultipleChoiceSingle => QuestionKind::MultipleChoiceSingle {
            options,
            correct_answer: single_answer(answers)?.unwrap_or_default(),
        },
        QuestionType::MultipleChoiceMultiple => QuestionKind::MultipleChoiceMultiple {
            options,
            correct_answer: answers,
        },
        QuestionType::TrueFalse => {
            let answer = single_answer(answers)?
                .ok_or_else(|| anyhow!("true_false needs --answer True or --answer False"))?;
            let correct_answer = match answer.trim().to_lowercase().as_str() {
                "true" | "t" | "yes" => "True",
                "false" | "f" | "no" => "False",
                other => bail!("true_false answer must be True or False, got {other:?}"),
            };
            QuestionKind::TrueFalse {
                correct_answer: correct_answer.to_string(),
            }
        }
        QuestionType::ShortAnswer => QuestionKind::ShortAnswer {
            correct_answer: single_answer(answers)?,
        },
        QuestionType::Paragraph => QuestionKind::Paragraph {
            correct_answer: single_answer(answers)?,
        },
    };

    Ok(kind)
}
