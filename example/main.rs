use neuro_ldl::prelude::*;
use neuro_ldl::network;
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

// One damped Gauss-Newton step on a small regression problem:
// factorize (JᵀJ + μI) and solve for the parameter delta.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let x = Array2::from_shape_fn((200, 1), |(i, _)| i as f64 * 0.005);
    let y = x.mapv(|v| (6.0 * v).sin());

    let mut rng = UniformSource::new(-1.0, 1.0, 17)?;
    let mut model = network!(
        input_shape 1,
        layer 8, activation Activation::Tanh,
        layer 1, activation Activation::Linear;
        rng rng
    )?;
    info!("{}", model.summary());

    let mu = 0.01;
    let delta = 1e-7;
    let w = model.parameters();
    let y_pred = model.evaluate_batch(x.view())?;
    let err = (&y_pred - &y).into_shape_with_order(x.nrows())?;
    let error_old = err.mapv(|e| e * e).sum();

    // Forward-difference Jacobian, one column per parameter.
    let columns: Vec<Array1<f64>> = (0..w.len())
        .into_par_iter()
        .map(|i| -> Result<Array1<f64>> {
            let mut perturbed = model.clone();
            let mut w_clone = w.clone();
            w_clone[i] += delta;
            perturbed.set_parameters(w_clone.view())?;
            let y_perturbed = perturbed.evaluate_batch(x.view())?;
            Ok(((y_perturbed - &y_pred) / delta).into_shape_with_order(x.nrows())?)
        })
        .collect::<Result<Vec<_>>>()?;
    let mut j = Array2::<f64>::zeros((x.nrows(), w.len()));
    for (i, column) in columns.iter().enumerate() {
        j.column_mut(i).assign(column);
    }

    let hessian = j.t().dot(&j) + Array2::<f64>::eye(w.len()) * mu;
    let gradient = j.t().dot(&err);

    let decomposition = LdltDecomposition::new(hessian, false)?;
    info!(
        positive_definite = decomposition.is_positive_definite(),
        log_determinant = decomposition.log_determinant()?,
        "normal equations factorized"
    );
    let step = decomposition.solve(gradient.view())?;

    model.set_parameters((&w - &step).view())?;
    let y_new = model.evaluate_batch(x.view())?;
    let error_new = (&y_new - &y).mapv(|e| e * e).sum();

    info!(error_old, error_new, "damped Gauss-Newton step");

    let sample = array![0.5];
    let prediction = model.compute(sample.view())?;
    info!("prediction at {}: {}", sample[0], prediction[0]);

    Ok(())
}
