pub mod formatter;

pub use formatter::{
    format_movie_detail, format_oracle_badge, format_scored_table, format_tsv, should_use_colors,
    ScoredMovie,
};
