use anyhow::{Context, Result};

use crate::{
    config::Config,
    db::MemoryStore,
    game::QUESTIONS_PER_GAME,
    logging,
    questions::QuestionPool,
    service::GameService,
};

/// Load configuration from the environment, install logging and build the service
pub async fn start_from_env() -> Result<GameService<MemoryStore>> {
    let config = Config::from_env()?;
    logging::init(&config.logging.filter).context("Failed to initialize logging")?;
    tracing::info!("Configuration loaded");

    build_service(&config).await
}

/// Build a service over an in-memory store with the configured question pool
pub async fn build_service(config: &Config) -> Result<GameService<MemoryStore>> {
    let pool = QuestionPool::load(&config.game.question_pool_path).await?;

    let missing: Vec<usize> = (0..QUESTIONS_PER_GAME)
        .filter(|level| pool.count_for_level(*level) == 0)
        .collect();
    if !missing.is_empty() {
        tracing::warn!(
            "Question pool has no questions for levels {:?}; games cannot start until it does",
            missing
        );
    }

    Ok(GameService::new(MemoryStore::new(), pool, config.game.clone()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        config::{GameConfig, LoggingConfig},
        db::GameRepository,
        error::GameError,
    };

    fn config_for(path: &std::path::Path) -> Config {
        Config {
            game: GameConfig {
                question_pool_path: path.display().to_string(),
                ..GameConfig::default()
            },
            logging: LoggingConfig {
                filter: "warn".to_string(),
            },
        }
    }

    fn pool_file(levels: std::ops::Range<usize>) -> tempfile::NamedTempFile {
        let records: Vec<serde_json::Value> = levels
            .map(|level| {
                serde_json::json!({
                    "level": level,
                    "text": format!("Question {}", level),
                    "correct_answer": "yes",
                    "wrong_answers": ["no", "maybe", "never"],
                })
            })
            .collect();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&records).unwrap().as_bytes())
            .unwrap();
        file
    }

    #[tokio::test]
    async fn test_build_service_from_config() {
        let file = pool_file(0..QUESTIONS_PER_GAME);
        let service = build_service(&config_for(file.path())).await.unwrap();
        service.register_player(1, "alice");

        let game = service.start_game(1, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(service.repository().active_game_for(1), Some(game.game_id));
    }

    #[tokio::test]
    async fn test_build_service_with_incomplete_pool() {
        let file = pool_file(0..10);
        let service = build_service(&config_for(file.path())).await.unwrap();
        service.register_player(1, "alice");

        assert_eq!(
            service.start_game(1, &mut StdRng::seed_from_u64(0)).unwrap_err(),
            GameError::NotEnoughQuestions { level: 10 }
        );
    }

    #[tokio::test]
    async fn test_build_service_fails_without_pool_file() {
        let config = config_for(std::path::Path::new("/nonexistent/questions.json"));
        assert!(build_service(&config).await.is_err());
    }
}
