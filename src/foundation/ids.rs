slotmap::new_key_type! {
    /// Arena key of a scene-graph container.
    pub struct ContainerId;
    /// Arena key of a scene-graph drawable.
    pub struct DrawableId;
    /// Arena key of an animation attached to a drawable.
    pub struct AnimationId;
}
