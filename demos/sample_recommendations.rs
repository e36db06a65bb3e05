//! Recommendations for the 5 × 4 sample interaction matrix.
//!
//! Run with `RUST_LOG=debug` to see the singular values and tie bands.

use svd_recommend::{InteractionMatrix, Recommender, RecommenderConfig, SvdStrategy};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    #[rustfmt::skip]
    let data = vec![
        5.0, 3.0, 0.0, 1.0,
        4.0, 0.0, 0.0, 1.0,
        1.0, 1.0, 0.0, 5.0,
        1.0, 0.0, 0.0, 4.0,
        0.0, 1.0, 5.0, 4.0,
    ];
    let matrix = InteractionMatrix::from_row_major(5, 4, data)?;

    for strategy in [SvdStrategy::Bidiagonal, SvdStrategy::Jacobi] {
        let recommender = Recommender::from_strategy(strategy, RecommenderConfig::default());
        let approximation = recommender.approximate(&matrix)?;

        println!("{strategy:?} SVD");
        println!("Singular values: {:.4}", approximation.singular_values().transpose());
        println!("Approximated Matrix:{:.4}", approximation.approximate_matrix());
        println!("Max reconstruction error: {:e}", approximation.reconstruction_error());

        for (user, items) in approximation.recommend_all()?.iter().enumerate() {
            println!("Recommended items for user {}: {:?}", user + 1, items);
        }
        println!();
    }

    Ok(())
}
