use std::path::PathBuf;

use atelier_core::types::{CategoryId, ProductId};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "atelier-admin", version, about = "Store administration from the command line")]
pub struct Cli {
    /// Backend base URL; overrides ATELIER_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Debug, Subcommand)]
pub enum Cmd {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ATELIER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Change the account password; signs out on success
    ResetPassword {
        #[arg(long, env = "ATELIER_OLD_PASSWORD", hide_env_values = true)]
        old: String,
        #[arg(long = "new", env = "ATELIER_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
        #[arg(long, env = "ATELIER_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm: String,
    },
    Categories {
        #[command(subcommand)]
        cmd: CategoryCmd,
    },
    Products {
        #[command(subcommand)]
        cmd: ProductCmd,
    },
    Settings {
        #[command(subcommand)]
        cmd: SettingsCmd,
    },
}

#[derive(Debug, Subcommand)]
pub enum CategoryCmd {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Update {
        id: CategoryId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProductCmd {
    /// Search the catalogue, one page at a time
    Search {
        #[arg(long)]
        term: Option<String>,
        #[arg(long)]
        category: Option<CategoryId>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Show {
        id: ProductId,
    },
    Create {
        #[command(flatten)]
        fields: ProductFields,
    },
    Update {
        id: ProductId,
        #[command(flatten)]
        fields: ProductFields,
        /// Position (0-based) of a stored image to drop; repeatable
        #[arg(long = "remove-image")]
        remove_images: Vec<usize>,
    },
    /// Flip a product between available and hidden
    ToggleStatus {
        id: ProductId,
    },
}

/// Draft fields settable from the command line. On update, omitted fields
/// keep their stored value and list fields replace the stored list.
#[derive(Debug, Args)]
pub struct ProductFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub description: Option<String>,
    /// Category id; repeatable
    #[arg(long = "category")]
    pub categories: Vec<CategoryId>,
    /// Standard size; repeatable
    #[arg(long = "size")]
    pub sizes: Vec<u32>,
    /// Colour label; repeatable
    #[arg(long = "color")]
    pub colors: Vec<String>,
    #[arg(long)]
    pub custom_size: Option<bool>,
    /// Local image file to upload; repeatable
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCmd {
    Show,
    Update {
        #[arg(long)]
        facebook: Option<String>,
        #[arg(long)]
        instagram: Option<String>,
        #[arg(long)]
        whatsapp: Option<String>,
        #[arg(long)]
        contact_email: Option<String>,
        #[arg(long)]
        wholesale_at: Option<u32>,
    },
}
