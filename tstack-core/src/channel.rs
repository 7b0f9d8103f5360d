/// Per-channel transform stacks and the matrix upload boundary
use nalgebra::Matrix4;

use crate::stack::TransformStack;

/// Receiver of named matrices, typically a shader program's uniforms.
///
/// This is the only point where stack contents leave the core.
pub trait MatrixSink {
    fn upload_matrix(&mut self, name: &str, matrix: &Matrix4<f32>);
}

/// Records every upload in order.
impl MatrixSink for Vec<(String, Matrix4<f32>)> {
    fn upload_matrix(&mut self, name: &str, matrix: &Matrix4<f32>) {
        self.push((name.to_owned(), *matrix));
    }
}

/// Fans one upload out to several sinks, e.g. every program sharing a camera.
impl MatrixSink for [&mut dyn MatrixSink] {
    fn upload_matrix(&mut self, name: &str, matrix: &Matrix4<f32>) {
        for sink in self.iter_mut() {
            sink.upload_matrix(name, matrix);
        }
    }
}

impl<S: MatrixSink + ?Sized> MatrixSink for &mut S {
    fn upload_matrix(&mut self, name: &str, matrix: &Matrix4<f32>) {
        (**self).upload_matrix(name, matrix);
    }
}

/// Logical transform channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Model,
    View,
    Projection,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Model, Channel::View, Channel::Projection];

    /// Uniform name the channel is uploaded under
    pub fn uniform_name(self) -> &'static str {
        match self {
            Channel::Model => "model",
            Channel::View => "view",
            Channel::Projection => "projection",
        }
    }
}

/// One independent stack per channel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transforms {
    pub model: TransformStack,
    pub view: TransformStack,
    pub projection: TransformStack,
}

impl Transforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: Channel) -> &TransformStack {
        match channel {
            Channel::Model => &self.model,
            Channel::View => &self.view,
            Channel::Projection => &self.projection,
        }
    }

    pub fn get_mut(&mut self, channel: Channel) -> &mut TransformStack {
        match channel {
            Channel::Model => &mut self.model,
            Channel::View => &mut self.view,
            Channel::Projection => &mut self.projection,
        }
    }

    /// Upload the top of one channel under its uniform name
    pub fn upload<S: MatrixSink + ?Sized>(&self, channel: Channel, sink: &mut S) {
        sink.upload_matrix(channel.uniform_name(), &self.get(channel).top());
    }

    pub fn upload_all<S: MatrixSink + ?Sized>(&self, sink: &mut S) {
        for channel in Channel::ALL {
            self.upload(channel, sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_channels_are_independent() {
        let mut transforms = Transforms::new();
        transforms
            .get_mut(Channel::Model)
            .translate(&Vector3::new(1.0, 0.0, 0.0));
        transforms.view.push();

        assert_ne!(transforms.model.top(), Matrix4::identity());
        assert_eq!(transforms.view.depth(), 2);
        assert_eq!(transforms.projection, TransformStack::new());
    }

    #[test]
    fn test_upload_all_uses_uniform_names() {
        let mut transforms = Transforms::new();
        transforms.projection.perspective(50.0, 1.0, 0.1, 100.0);

        let mut uploads: Vec<(String, Matrix4<f32>)> = Vec::new();
        transforms.upload_all(&mut uploads);

        let names: Vec<&str> = uploads.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["model", "view", "projection"]);
        assert_eq!(uploads[2].1, transforms.projection.top());
    }

    #[test]
    fn test_fan_out_reaches_every_sink() {
        let mut colored: Vec<(String, Matrix4<f32>)> = Vec::new();
        let mut solid: Vec<(String, Matrix4<f32>)> = Vec::new();
        let mut transforms = Transforms::new();
        transforms.view.translate(&Vector3::new(0.0, 0.0, -5.0));

        {
            let sinks: &mut [&mut dyn MatrixSink] = &mut [&mut colored, &mut solid];
            transforms.upload(Channel::View, sinks);
        }

        assert_eq!(colored, solid);
        assert_eq!(colored[0].0, "view");
        assert_eq!(colored[0].1, transforms.view.top());
    }
}
