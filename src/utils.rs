/// Build a randomized network from a compact layer list.
///
/// ```ignore
/// let mut rng = UniformSource::new(-1.0, 1.0, 7)?;
/// let network = network!(input_shape 2, layer 4, activation Activation::Tanh,
///                        layer 1, activation Activation::Linear; rng rng)?;
/// ```
#[macro_export]
macro_rules! network {
    (input_shape $i:expr, $(layer $n:expr, activation $a:expr),+ ; rng $rng:expr) => {
        {
            let builder = $crate::models::Network::builder($i);
            $(
                let builder = builder.add_layer($n, ::std::sync::Arc::new($a));
            )+
            builder.build(&mut $rng)
        }
    };
}
