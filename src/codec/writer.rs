/// Little-endian byte writer used to synthesize save fixtures in tests
pub struct BinaryWriter {
    data: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn write_zeros(&mut self, n: usize) {
        self.data.resize(self.data.len() + n, 0);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.data.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(if v { 1 } else { 0 });
    }

    pub fn write_u16_le(&mut self, v: u16) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i16_le(&mut self, v: i16) {
        self.write_u16_le(v as u16);
    }

    pub fn write_u32_le(&mut self, v: u32) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32_le(&mut self, v: i32) {
        self.write_u32_le(v as u32);
    }

    /// Write a string with a single length byte
    pub fn write_string(&mut self, s: &str) {
        assert!(s.len() <= u8::MAX as usize, "string too long for a length byte");
        self.write_u8(s.len() as u8);
        self.write_bytes(s.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::reader::BinaryReader;

    #[test]
    fn test_write_read_primitives() {
        let mut writer = BinaryWriter::new();
        writer.write_u8(0x01);
        writer.write_i16_le(-3);
        writer.write_u32_le(0xDEADBEEF);
        writer.write_string("xin-xi");
        writer.write_zeros(2);
        assert_eq!(writer.len(), 1 + 2 + 4 + 7 + 2);

        let data = writer.into_vec();
        let mut reader = BinaryReader::new(&data);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
        assert_eq!(reader.read_i16_le().unwrap(), -3);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_string().unwrap(), "xin-xi");
        assert_eq!(reader.read_bytes(2).unwrap(), &[0, 0]);
    }
}
