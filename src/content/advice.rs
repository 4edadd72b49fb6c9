//! Feedback text shown after an exercise is checked.

use serde::Serialize;

use crate::db::WeakOrthogram;

/// Everything right.
pub const PRAISE: &str =
    "Отлично! Все правильно. Так держать! Двигайся дальше - выполни другие упражнения.";

const WITH_MISTAKES: &str = "Выполнено с ошибками. ";

const GENERIC_HINT: &str = "Постарайся сам разобраться - найди в планинге твой случай, \
прочитай объяснение, запиши слово в ячейку. Тут нужно подумать!\n\n\
Если сложно - Нейростат поможет.";

const VOCABULARY_HINT: &str = "Слова на орфограмму 2 запоминаются, поэтому записывай их в \
ячейку - это будет твой словарик!";

const PREPOSITION_ADVICE: &str = "Ты допустил ошибки в предлогах (орфограмма 66.1). Попробуй \
вспомнить, что пишется на конце производных предлогов. Посмотри (создай) словарик в планинге. \
Запиши слово в планинг.";

/// Advice for a checked exercise.
///
/// `first_mistake` is the orthogram of the first wrong answer, `None` when
/// everything was right.
pub fn exercise_advice(first_mistake: Option<&str>) -> String {
    match first_mistake {
        None => PRAISE.to_string(),
        Some("2") => format!("{}{}", WITH_MISTAKES, VOCABULARY_HINT),
        Some("661") => PREPOSITION_ADVICE.to_string(),
        Some(_) => format!("{}{}", WITH_MISTAKES, GENERIC_HINT),
    }
}

/// Question line for the daily quiz.
pub fn quiz_question(blanked: &str) -> String {
    format!("Как правильно пишется:\n\n{}", blanked)
}

const ALL_WORDS_RIGHT: &str = "Отлично! Все слова написаны правильно. Так держать!";

const LOOK_CLOSER: &str = "Обрати внимание на написание этих слов.";

const INACTIVE_WEEK: &str = "За последнюю неделю ты не выполнял упражнений. Пора начать!";

/// One line per wrong word with its explanation, then similar words to
/// remember for the first one.
///
/// `mistakes` holds `(word, explanation)` pairs in answer order.
pub fn mistakes_explanation(mistakes: &[(String, String)], similar: &[String]) -> String {
    if mistakes.is_empty() {
        return ALL_WORDS_RIGHT.to_string();
    }
    let mut lines: Vec<String> = mistakes
        .iter()
        .map(|(word, why)| format!("• «{}» - {}", word, why))
        .collect();
    if similar.is_empty() {
        lines.push(LOOK_CLOSER.to_string());
    } else {
        lines.push(format!("\nЗапомни похожие слова: {}.", similar.join(", ")));
    }
    lines.join("\n")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Active,
    Inactive,
}

/// A student's last seven days at a glance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
    pub status: ReportStatus,
    pub total: i64,
    pub correct: i64,
    pub success_rate: f64,
    pub weak_orthograms: Vec<WeakOrthogram>,
    pub message: String,
}

pub fn weekly_report(total: i64, correct: i64, weak_orthograms: Vec<WeakOrthogram>) -> WeeklyReport {
    if total == 0 {
        return WeeklyReport {
            status: ReportStatus::Inactive,
            total: 0,
            correct: 0,
            success_rate: 0.0,
            weak_orthograms: Vec::new(),
            message: INACTIVE_WEEK.to_string(),
        };
    }
    // One decimal place
    let success_rate = (correct as f64 * 1000.0 / total as f64).round() / 10.0;
    WeeklyReport {
        status: ReportStatus::Active,
        total,
        correct,
        success_rate,
        weak_orthograms,
        message: format!(
            "Ты выполнил {} заданий, {} из них - правильно ({}%).",
            total, correct, success_rate
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_praise_when_all_correct() {
        assert_eq!(exercise_advice(None), PRAISE);
    }

    #[test]
    fn test_orthogram_specific_advice() {
        assert!(exercise_advice(Some("2")).contains("словарик"));
        assert!(exercise_advice(Some("2")).starts_with("Выполнено с ошибками."));
        assert!(exercise_advice(Some("661")).contains("66.1"));
        assert!(exercise_advice(Some("15")).contains("Нейростат"));
    }

    #[test]
    fn test_quiz_question() {
        assert_eq!(quiz_question("в течени😊"), "Как правильно пишется:\n\nв течени😊");
    }

    #[test]
    fn test_mistakes_explanation_lists_words() {
        assert_eq!(mistakes_explanation(&[], &[]), ALL_WORDS_RIGHT);

        let mistakes = vec![
            ("Деревянный дом".to_string(), "Исключение.".to_string()),
            ("кожаный".to_string(), "Суффикс -ан-.".to_string()),
        ];
        let text = mistakes_explanation(&mistakes, &["оловянный".to_string(), "стеклянный".to_string()]);
        assert_eq!(
            text,
            "• «Деревянный дом» - Исключение.\n• «кожаный» - Суффикс -ан-.\n\nЗапомни похожие слова: оловянный, стеклянный."
        );
        assert!(mistakes_explanation(&mistakes[..1], &[]).ends_with(LOOK_CLOSER));
    }

    #[test]
    fn test_weekly_report() {
        let report = weekly_report(0, 0, Vec::new());
        assert_eq!(report.status, ReportStatus::Inactive);
        assert_eq!(report.message, INACTIVE_WEEK);

        let weak = vec![WeakOrthogram {
            orthogram_id: "1500".to_string(),
            name: "Н и НН".to_string(),
            errors: 2,
        }];
        let report = weekly_report(3, 1, weak.clone());
        assert_eq!(report.status, ReportStatus::Active);
        assert_eq!(report.success_rate, 33.3);
        assert_eq!(report.weak_orthograms, weak);
        assert_eq!(report.message, "Ты выполнил 3 заданий, 1 из них - правильно (33.3%).");

        let json = serde_json::to_value(weekly_report(4, 4, Vec::new())).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["success_rate"], 100.0);
    }
}
