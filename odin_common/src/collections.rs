/*
 * Copyright © 2024, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::collections::VecDeque;

/// a VecDeque used as a ringbuffer, i.e. with a fixed maximum number of elements.
/// Note we keep our own bound since `VecDeque::with_capacity(n)` only guarantees a capacity of *at least* n
#[derive(Debug,Clone)]
pub struct RingBuffer<T> {
    max_len: usize,
    items: VecDeque<T>
}

impl<T> RingBuffer<T> {
    pub fn new (max_len: usize)->Self {
        RingBuffer { max_len, items: VecDeque::with_capacity(max_len) }
    }

    pub fn max_len (&self)->usize { self.max_len }
    pub fn len (&self)->usize { self.items.len() }
    pub fn is_empty (&self)->bool { self.items.is_empty() }
    pub fn is_full (&self)->bool { self.items.len() >= self.max_len }

    /// push a new element to the end, returning the element that was dropped from the front to make room.
    /// A ringbuffer with max_len 0 does not store anything
    pub fn push (&mut self, t: T)->Option<T> {
        if self.max_len == 0 { return Some(t) }

        let dropped = if self.items.len() >= self.max_len { self.items.pop_front() } else { None };
        self.items.push_back(t);
        dropped
    }

    pub fn back (&self)->Option<&T> { self.items.back() }
    pub fn front (&self)->Option<&T> { self.items.front() }

    pub fn iter (&self)->impl Iterator<Item=&T> { self.items.iter() }

    pub fn clear (&mut self) { self.items.clear() }
}

impl<T: Clone> RingBuffer<T> {
    pub fn to_vec (&self)->Vec<T> { self.items.iter().cloned().collect() }
}
