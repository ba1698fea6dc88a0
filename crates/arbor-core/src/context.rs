/// Marker for caller-supplied decision state.
///
/// The decision core never inspects the context: scorers read from it and
/// actions write to it, so it is the seam through which all domain state
/// flows. The core intentionally does not prescribe what a context must
/// expose.
pub trait Context: 'static {}
