use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Favorite {
    pub id: String,
    pub acc_id: String,
    pub pro_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFavorite {
    pub pro_id: String,
}
