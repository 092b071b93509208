// src/common/response.rs

use serde::Serialize;
use utoipa::ToSchema;

// Envelope padrão de todas as respostas de sucesso: { success, data }.
// Os erros usam o mesmo formato com `error` (ver ApiError).
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data }
    }
}

/// Resultado de uma consulta paginada: a fatia da página e o total filtrado.
#[derive(Debug, Serialize, ToSchema)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }
}
