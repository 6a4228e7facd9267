use crate::domain::errors::DomainError;

const CNT_LIVE_REQUIRES_DRAFT: &str = "published_articles_id_fkey";
const CNT_ARTICLE_PKEY: &str = "articles_pkey";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    CNT_LIVE_REQUIRES_DRAFT => DomainError::IntegrityViolation(
                        "live article has no matching draft".into(),
                    ),
                    CNT_ARTICLE_PKEY => {
                        DomainError::Persistence("article id already exists".into())
                    }
                    other => {
                        DomainError::Persistence(format!("database constraint violation: {other}"))
                    }
                };
            }

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => {
                        return DomainError::Persistence("unique constraint violated".into());
                    }
                    "23503" => {
                        return DomainError::IntegrityViolation(
                            "referenced record not found".into(),
                        );
                    }
                    "23514" => {
                        return DomainError::Persistence("check constraint violated".into());
                    }
                    _ => {}
                }
            }

            DomainError::Persistence(db_err.message().to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}
