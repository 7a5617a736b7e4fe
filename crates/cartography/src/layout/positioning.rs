//! Coordinate assignment for ordered layers.

use log::debug;

use cartography_core::geometry::Point;

use crate::layout::{LayoutOptions, NodeLayout, layering::Layers};

/// Maps `(layer, index within layer)` to absolute top-left positions.
///
/// Layers advance along the main axis (y for `TB`/`BT`, x for `LR`/`RL`),
/// reversed for `BT` and `RL`. Within a layer nodes are spaced along the cross
/// axis and every layer is centered against the widest one.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateAssigner {
    options: LayoutOptions,
}

impl CoordinateAssigner {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// Returns one layout per node, indexed by the node's position in graph order.
    pub fn assign(&self, layers: &Layers, node_count: usize) -> Vec<NodeLayout> {
        let options = &self.options;
        let main_step = options.main_extent() + options.main_spacing();
        let cross_step = options.cross_extent() + options.cross_spacing();
        let layer_count = layers.len();
        let widest = layers.iter().map(Vec::len).max().unwrap_or(0);
        let widest_extent = Self::layer_extent(widest, options);

        let mut placed = vec![NodeLayout::new(0, Point::default(), options.node_size); node_count];
        for (layer_index, layer) in layers.iter().enumerate() {
            let main_slot = if options.direction.is_reversed() {
                layer_count - 1 - layer_index
            } else {
                layer_index
            };
            let main = main_slot as f32 * main_step;
            let offset = (widest_extent - Self::layer_extent(layer.len(), options)) / 2.0;

            for (index, &node) in layer.iter().enumerate() {
                let cross = offset + index as f32 * cross_step;
                let position = if options.direction.is_vertical() {
                    Point::new(cross, main)
                } else {
                    Point::new(main, cross)
                };
                placed[node] = NodeLayout::new(layer_index, position, options.node_size);
            }
        }

        debug!(
            layers = layer_count,
            widest,
            direction:% = options.direction;
            "Coordinates assigned"
        );
        placed
    }

    /// Cross-axis extent of a layer holding `count` nodes.
    fn layer_extent(count: usize, options: &LayoutOptions) -> f32 {
        if count == 0 {
            return 0.0;
        }
        count as f32 * options.cross_extent() + (count - 1) as f32 * options.cross_spacing()
    }
}
