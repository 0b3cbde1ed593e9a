pub mod refresh_token;
pub mod url;
pub mod user;

pub use refresh_token::Entity as RefreshTokenEntity;
pub use url::Entity as UrlEntity;
pub use user::Entity as UserEntity;
