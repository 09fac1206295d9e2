//! File/code adapted from https://github.com/jamjamjon/usls

use crate::data::NmsMode;

pub trait Nms {
    fn iou(&self, other: &Self) -> f32;
    fn confidence(&self) -> f32;
    fn class_id(&self) -> usize;
}

/// Greedy suppression in place.
///
/// Boxes are stably sorted by confidence, highest first. A box survives when its IoU with
/// every already kept box (of the same class in [`NmsMode::ClassPartitioned`]) is at most
/// `iou_threshold`. Survivors stay sorted by confidence, so a second pass changes nothing.
pub fn nms<T: Nms>(boxes: &mut Vec<T>, iou_threshold: f32, mode: NmsMode) {
    boxes.sort_by(|b1, b2| {
        b2.confidence()
            .partial_cmp(&b1.confidence())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut current_index = 0;
    for index in 0..boxes.len() {
        let mut drop = false;
        for prev_index in 0..current_index {
            if mode == NmsMode::ClassPartitioned && boxes[prev_index].class_id() != boxes[index].class_id() {
                continue;
            }
            let iou = boxes[prev_index].iou(&boxes[index]);
            if iou > iou_threshold {
                drop = true;
                break;
            }
        }
        if !drop {
            boxes.swap(current_index, index);
            current_index += 1;
        }
    }
    boxes.truncate(current_index);
}

/// Keeps at most `max` of the highest-confidence boxes. Expects NMS output order.
pub fn cap_detections<T>(boxes: &mut Vec<T>, max: Option<usize>) {
    if let Some(max) = max {
        boxes.truncate(max);
    }
}
