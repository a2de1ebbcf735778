use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::{ProfileError, QuestionError};
use crate::rewards::RewardError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Rewards(#[from] RewardError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Question(#[from] QuestionError),
}
