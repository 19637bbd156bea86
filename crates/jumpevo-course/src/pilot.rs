use jumpevo_network::Network;

use crate::Observation;

/// Decides each tick whether its jumper jumps.
pub trait Pilot {
    fn wants_jump(&mut self, observation: &Observation) -> bool;
}

impl<P> Pilot for &mut P
where
    P: Pilot + ?Sized,
{
    fn wants_jump(&mut self, observation: &Observation) -> bool {
        (**self).wants_jump(observation)
    }
}

/// A network pilot feeds `[height, next gap height]` to the network and jumps
/// when its first output exceeds 0.5.
///
/// A network whose input layer does not take two values never jumps.
impl Pilot for Network {
    fn wants_jump(&mut self, observation: &Observation) -> bool {
        self.compute(&observation.inputs())
            .is_ok_and(|output| output.first().is_some_and(|&value| value > 0.5))
    }
}

/// Pilot backed by a closure. Returned by [`from_fn`].
#[derive(Debug, Clone)]
pub struct FromFn<F>(F);

impl<F> Pilot for FromFn<F>
where
    F: FnMut(&Observation) -> bool,
{
    fn wants_jump(&mut self, observation: &Observation) -> bool {
        (self.0)(observation)
    }
}

/// Creates a pilot from a closure.
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut(&Observation) -> bool,
{
    FromFn(f)
}
