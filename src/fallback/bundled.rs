use crate::model::{Agent, AgentStatus, ContentStatus, Guide, Prompt, Ruleset, User, UserRole};

fn s(value: &str) -> Option<String> {
    Some(value.to_string())
}

pub(super) fn guides() -> Vec<Guide> {
    [
        (
            1,
            "Развертывание RIG с Нуля",
            "Полное руководство по настройке окружения для вайб-кодинга.",
            "Алекс М.",
            "CLAUDE CODE",
            "15 МИН",
            "3,245",
            "10 ФЕВ",
        ),
        (
            2,
            "Конфигурация Репозитория",
            "Структура папок, конфигурация агентов и правила Cursor.",
            "Дмитрий С.",
            "CURSOR",
            "10 МИН",
            "2,156",
            "12 ФЕВ",
        ),
        (
            3,
            "Единый Журнал Решений",
            "Контекстно-зависимые записи архитектурных решений.",
            "Елена П.",
            "ОСНОВЫ",
            "8 МИН",
            "1,834",
            "14 ФЕВ",
        ),
        (
            4,
            "Продвинутые Агенты",
            "Кастомные агенты, MCP серверы, оркестрация рабочих процессов.",
            "Игорь В.",
            "АГЕНТЫ",
            "20 МИН",
            "1,245",
            "15 ФЕВ",
        ),
    ]
    .into_iter()
    .map(
        |(id, title, desc, author, category, time, views, date)| Guide {
            id,
            title: title.to_string(),
            desc: s(desc),
            author_name: s(author),
            category: s(category),
            time: s(time),
            views: views.to_string(),
            date: s(date),
            content: None,
            status: ContentStatus::Published,
            created_at: None,
        },
    )
    .collect()
}

pub(super) fn prompts() -> Vec<Prompt> {
    [
        (
            1,
            "Анализ Конкурентов v2",
            "Структурированный разбор рынка по пяти осям.",
            "Алекс М.",
            "2.4K",
            &["analysis", "research"][..],
            "GPT-4",
        ),
        (
            2,
            "SQL Query Optimizer",
            "Находит медленные запросы и предлагает индексы.",
            "Дмитрий С.",
            "1.1K",
            &["sql", "performance"][..],
            "POSTGRES",
        ),
        (
            3,
            "Code-Review Agent PRO",
            "Ревью диффа с фокусом на безопасность.",
            "Елена П.",
            "860",
            &["review", "security"][..],
            "CLAUDE",
        ),
    ]
    .into_iter()
    .map(|(id, title, desc, author, copies, tags, tech)| Prompt {
        id,
        title: title.to_string(),
        desc: s(desc),
        author_name: s(author),
        copies: copies.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        tech: s(tech),
        content: None,
        status: ContentStatus::Published,
        created_at: None,
    })
    .collect()
}

pub(super) fn rulesets() -> Vec<Ruleset> {
    vec![
        Ruleset {
            id: 1,
            title: "React + TypeScript".to_string(),
            desc: s("Стандартные правила для функциональных компонентов и хуков."),
            language: s("TYPESCRIPT"),
            content: None,
            content_status: ContentStatus::Published,
        },
        Ruleset {
            id: 2,
            title: "Стандарты FastAPI".to_string(),
            desc: s("Pydantic v2, асинхронные паттерны и обработка ошибок."),
            language: s("PYTHON"),
            content: None,
            content_status: ContentStatus::Published,
        },
    ]
}

pub(super) fn agents() -> Vec<Agent> {
    [
        (
            1,
            "01",
            "Агент Код-Ревью",
            "Автоматическое ревью с фокусом на безопасность и производительность.",
            AgentStatus::Active,
        ),
        (
            2,
            "02",
            "Агент Документации",
            "Генерация и поддержка документации.",
            AgentStatus::Active,
        ),
        (
            3,
            "03",
            "Генератор Тестов",
            "Создание юнит- и интеграционных тестов.",
            AgentStatus::Beta,
        ),
    ]
    .into_iter()
    .map(|(id, number, title, desc, status)| Agent {
        id,
        number: s(number),
        title: title.to_string(),
        desc: s(desc),
        status,
        content_status: ContentStatus::Published,
    })
    .collect()
}

pub(super) fn users() -> Vec<User> {
    [
        (881, "Алекс М.", "alex.m@rig.ai", UserRole::Admin, true),
        (742, "Дмитрий С.", "dim@rig.ai", UserRole::Moderator, true),
        (109, "Мария К.", "k.maria@corp.io", UserRole::User, false),
        (3, "Игорь В.", "iv@rig.ai", UserRole::User, true),
    ]
    .into_iter()
    .map(|(id, name, email, role, is_active)| User {
        id,
        email: email.to_string(),
        name: name.to_string(),
        role,
        is_active,
        requires_approval: false,
        created_at: None,
    })
    .collect()
}
