//! Backend commands queued from the shell to the backend worker.

use shared::{
    domain::ProductId,
    protocol::{Envelope, ProductRecord},
};

#[derive(Debug, Clone, PartialEq)]
pub enum SaveTarget {
    Create,
    Update(ProductId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    Signin {
        username: String,
        password: String,
    },
    CheckSession,
    ListProducts,
    SaveProduct {
        target: SaveTarget,
        payload: Envelope<ProductRecord>,
    },
    DeleteProduct {
        id: ProductId,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Signin { .. } => "signin",
            BackendCommand::CheckSession => "check_session",
            BackendCommand::ListProducts => "list_products",
            BackendCommand::SaveProduct {
                target: SaveTarget::Create,
                ..
            } => "create_product",
            BackendCommand::SaveProduct {
                target: SaveTarget::Update(_),
                ..
            } => "update_product",
            BackendCommand::DeleteProduct { .. } => "delete_product",
        }
    }
}
