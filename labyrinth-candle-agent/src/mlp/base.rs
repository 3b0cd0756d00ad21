use super::MlpConfig;
use anyhow::Result;
use candle_core::Tensor;
use candle_nn::{linear, Linear, Module, VarBuilder};
use std::iter::once;

/// Multilayer perceptron with ReLU activation function.
///
/// The output layer is linear.
pub struct Mlp {
    layers: Vec<Linear>,
}

impl Mlp {
    /// Builds the layers with variables created in `vb`.
    pub fn build(vb: VarBuilder, config: &MlpConfig) -> Result<Self> {
        config.validate()?;
        let dims: Vec<usize> = once(config.in_dim)
            .chain(config.units.iter().copied())
            .chain(once(config.out_dim))
            .collect();
        let vb = vb.pp("mlp");
        let layers = dims
            .windows(2)
            .enumerate()
            .map(|(i, d)| linear(d[0], d[1], vb.pp(format!("ln{}", i))))
            .collect::<candle_core::Result<Vec<_>>>()?;

        Ok(Self { layers })
    }

    /// Forward computation of a batch `[n, in_dim] -> [n, out_dim]`.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let n_layers = self.layers.len();
        let mut xs = xs.clone();

        for (i, layer) in self.layers.iter().enumerate() {
            xs = layer.forward(&xs)?;
            if i + 1 < n_layers {
                xs = xs.relu()?;
            }
        }

        Ok(xs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    #[test]
    fn test_output_shape() -> Result<()> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let mlp = Mlp::build(vb, &MlpConfig::new(6, vec![24, 24], 4))?;
        assert_eq!(varmap.all_vars().len(), 6);

        let xs = Tensor::zeros((3, 6), DType::F32, &Device::Cpu)?;
        assert_eq!(mlp.forward(&xs)?.dims(), &[3, 4]);
        Ok(())
    }

    #[test]
    fn test_zero_dim_is_rejected() {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        assert!(Mlp::build(vb, &MlpConfig::new(0, vec![8], 4)).is_err());
    }
}
