/// An update rule applied unconditionally once per step.
///
/// No convergence detection and no divergence guards; the loop runs for a
/// fixed step budget and an update is never skipped.
pub trait Optimizer {
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]);
}
